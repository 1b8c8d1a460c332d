//! Scan and transfer configuration types.

use std::path::PathBuf;
use std::time::Duration;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Vendor prefixes recognized in PS2 catalog codes.
pub const DEFAULT_GAME_ID_PREFIXES: &[&str] = &[
    "SLUS", "SCUS", "SLES", "SCES", "SLPM", "SLPS", "SCPS", "SCPM", "SLAJ", "SCAJ", "SLKA",
    "SCKA", "SCED", "SCCS",
];

/// Name of the bundled title list.
const CATALOG_FILE_NAME: &str = "ps2-gameslist.txt";

/// Bytes after the prefix in the longest token: `_123.45;1`.
const TOKEN_TAIL_LEN: usize = 9;

/// Configuration for identifier scanning.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Bytes read per window.
    #[builder(default = "1024 * 1024")]
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Trailing bytes carried into the next window.
    #[builder(default = "64")]
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Vendor prefixes to match.
    #[builder(default = "default_prefixes()")]
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    /// Catalog files to try, in order.
    #[builder(default = "default_catalog_candidates()")]
    #[serde(default = "default_catalog_candidates")]
    pub catalog_candidates: Vec<PathBuf>,
}

fn default_window_size() -> usize {
    1024 * 1024
}

fn default_overlap() -> usize {
    64
}

fn default_prefixes() -> Vec<String> {
    DEFAULT_GAME_ID_PREFIXES
        .iter()
        .map(|p| (*p).to_string())
        .collect()
}

/// Default catalog locations: next to the executable's parent directories,
/// then under the working directory.
pub fn default_catalog_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
    {
        candidates.push(exe_dir.join("..").join("assets").join(CATALOG_FILE_NAME));
        candidates.push(
            exe_dir
                .join("..")
                .join("..")
                .join("assets")
                .join(CATALOG_FILE_NAME),
        );
    }

    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join("assets").join(CATALOG_FILE_NAME));
    }

    candidates
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let prefixes = match &self.prefixes {
            Some(prefixes) => prefixes.clone(),
            None => default_prefixes(),
        };
        check_scan_settings(
            self.window_size.unwrap_or_else(default_window_size),
            self.overlap.unwrap_or_else(default_overlap),
            &prefixes,
        )
    }
}

fn check_scan_settings(
    window_size: usize,
    overlap: usize,
    prefixes: &[String],
) -> Result<(), String> {
    if window_size == 0 {
        return Err("Window size must be greater than zero".to_string());
    }
    if prefixes.is_empty() {
        return Err("At least one identifier prefix is required".to_string());
    }
    if let Some(bad) = prefixes
        .iter()
        .find(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_alphanumeric()))
    {
        return Err(format!("Invalid identifier prefix: '{bad}'"));
    }
    let min_overlap = longest_token_len(prefixes);
    if overlap < min_overlap {
        return Err(format!(
            "Overlap must be at least {min_overlap} bytes to catch split identifiers"
        ));
    }
    Ok(())
}

/// Length of the longest token the prefixes can produce (`PREFIX_123.45;1`).
fn longest_token_len(prefixes: &[String]) -> usize {
    prefixes.iter().map(String::len).max().unwrap_or(0) + TOKEN_TAIL_LEN
}

impl ScanConfig {
    /// Check settings that may have bypassed the builder, such as a struct
    /// literal or a deserialized file.
    ///
    /// The overlap must hold the longest token the prefixes can form, or an
    /// identifier split across two windows is missed.
    pub fn validate(&self) -> Result<(), String> {
        check_scan_settings(self.window_size, self.overlap, &self.prefixes)
    }

    /// Smallest overlap that still catches every split identifier.
    pub fn min_overlap(&self) -> usize {
        longest_token_len(&self.prefixes)
    }

    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Default config reading the catalog from the given candidates.
    pub fn with_catalog_candidates(candidates: Vec<PathBuf>) -> Self {
        Self {
            catalog_candidates: candidates,
            ..Self::default()
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            overlap: default_overlap(),
            prefixes: default_prefixes(),
            catalog_candidates: default_catalog_candidates(),
        }
    }
}

/// Configuration for file transfers.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct MoveConfig {
    /// Buffer size for the copy fallback.
    #[builder(default = "1024 * 1024")]
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Minimum wall-clock time between progress events.
    #[builder(default = "Duration::from_secs(1)")]
    #[serde(default = "default_progress_interval")]
    pub progress_interval: Duration,

    /// Flush the destination to disk before removing the source.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub sync_before_delete: bool,
}

fn default_chunk_size() -> usize {
    1024 * 1024
}

fn default_progress_interval() -> Duration {
    Duration::from_secs(1)
}

fn default_true() -> bool {
    true
}

impl MoveConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.chunk_size == Some(0) {
            return Err("Chunk size must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl MoveConfig {
    /// Create a new move config builder.
    pub fn builder() -> MoveConfigBuilder {
        MoveConfigBuilder::default()
    }
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            progress_interval: default_progress_interval(),
            sync_before_delete: true,
        }
    }
}
