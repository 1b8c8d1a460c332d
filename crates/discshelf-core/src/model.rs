//! Scan and transfer result types.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::TransferError;
use crate::id::{normalize, strip_volume_suffix};

const MIB: f64 = 1024.0 * 1024.0;

/// A game identifier found inside a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanMatch {
    raw_identifier: String,
    normalized_identifier: String,
    title: Option<String>,
}

impl ScanMatch {
    /// Build a match from the token exactly as it appeared in the file.
    pub fn new(raw_identifier: impl Into<String>, title: Option<String>) -> Self {
        let raw_identifier = raw_identifier.into();
        let normalized_identifier = normalize(&raw_identifier);
        Self {
            raw_identifier,
            normalized_identifier,
            title,
        }
    }

    /// The literal token, including any volume suffix.
    pub fn raw_identifier(&self) -> &str {
        &self.raw_identifier
    }

    /// The token without its volume suffix, e.g. `SLUS_123.45`.
    pub fn game_id(&self) -> &str {
        strip_volume_suffix(&self.raw_identifier)
    }

    /// Catalog lookup key, e.g. `SLUS-12345`.
    pub fn normalized_identifier(&self) -> &str {
        &self.normalized_identifier
    }

    /// Title from the catalog, if the catalog knows this game.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Result of a completed scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// A token was found; scanning stopped at the first one.
    Identified(ScanMatch),
    /// The whole file was read and no token was present.
    Unidentified,
}

impl ScanOutcome {
    /// The match, if any.
    pub fn as_match(&self) -> Option<&ScanMatch> {
        match self {
            Self::Identified(m) => Some(m),
            Self::Unidentified => None,
        }
    }

    pub fn is_identified(&self) -> bool {
        matches!(self, Self::Identified(_))
    }
}

/// Progress snapshot for a copy in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferProgress {
    /// Percent complete in `[0, 100]`.
    pub percent: f64,
    /// Bytes written so far.
    pub copied_bytes: u64,
    /// Size of the source when the copy started.
    pub total_bytes: u64,
    /// Seconds since the copy started.
    pub elapsed_seconds: f64,
}

impl TransferProgress {
    /// Create a snapshot; percent is derived from the byte counts.
    pub fn new(copied_bytes: u64, total_bytes: u64, elapsed_seconds: f64) -> Self {
        let percent = if total_bytes == 0 {
            100.0
        } else {
            ((copied_bytes as f64 / total_bytes as f64) * 100.0).clamp(0.0, 100.0)
        };
        Self {
            percent,
            copied_bytes,
            total_bytes,
            elapsed_seconds,
        }
    }

    /// Percent rounded to one decimal.
    pub fn percent_rounded(&self) -> f64 {
        round_to(self.percent, 1)
    }

    /// Copied size in MiB, two decimals.
    pub fn copied_mib(&self) -> f64 {
        round_to(self.copied_bytes as f64 / MIB, 2)
    }

    /// Total size in MiB, two decimals.
    pub fn total_mib(&self) -> f64 {
        round_to(self.total_bytes as f64 / MIB, 2)
    }

    /// Elapsed seconds, one decimal.
    pub fn elapsed_rounded(&self) -> f64 {
        round_to(self.elapsed_seconds, 1)
    }

    pub fn is_complete(&self) -> bool {
        self.copied_bytes >= self.total_bytes
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// How a transfer ended.
#[derive(Debug)]
pub enum TransferOutcome {
    /// Moved with a single rename; no progress was reported.
    Renamed { final_path: PathBuf },
    /// Moved by copying and then deleting the source.
    Copied { final_path: PathBuf },
    /// Nothing was moved.
    Failed { reason: TransferError },
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Where the file now lives.
    pub fn final_path(&self) -> Option<&Path> {
        match self {
            Self::Renamed { final_path } | Self::Copied { final_path } => Some(final_path),
            Self::Failed { .. } => None,
        }
    }

    /// The failure reason, if the transfer failed.
    pub fn error(&self) -> Option<&TransferError> {
        match self {
            Self::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

impl From<TransferError> for TransferOutcome {
    fn from(reason: TransferError) -> Self {
        Self::Failed { reason }
    }
}
