//! In-place rename of game images to `GAME_ID.Title.ext`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Errors from renaming a game file.
#[derive(Debug, Error)]
pub enum RenameError {
    /// The generated name is not a usable file name.
    #[error("Invalid file name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// Another file already has the generated name.
    #[error("'{}' already exists", path.display())]
    AlreadyExists { path: PathBuf },

    /// The rename itself failed.
    #[error("Rename of {} failed: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The file name a game image should carry: `{game_id}.{game_name}{.ext}`.
///
/// Path separators in the title are replaced with `-`.
pub fn game_file_name(path: &Path, game_id: &str, game_name: &str) -> String {
    let title: String = game_name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{game_id}.{title}.{ext}"),
        None => format!("{game_id}.{title}"),
    }
}

/// Rename a game image within its directory to the OPL naming scheme.
///
/// Returns the new path. Renaming a file to the name it already has is a
/// no-op.
pub fn rename_game_file(
    path: &Path,
    game_id: &str,
    game_name: &str,
) -> Result<PathBuf, RenameError> {
    let new_name = game_file_name(path, game_id, game_name);
    validate_filename(&new_name).map_err(|reason| RenameError::InvalidName {
        name: new_name.clone(),
        reason,
    })?;

    let parent = path.parent().unwrap_or(Path::new(""));
    let new_path = parent.join(&new_name);

    if new_path == path {
        return Ok(new_path);
    }
    if new_path.exists() {
        return Err(RenameError::AlreadyExists { path: new_path });
    }

    fs::rename(path, &new_path).map_err(|e| RenameError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!(from = %path.display(), to = %new_path.display(), "renamed game file");
    Ok(new_path)
}

/// Validate a filename for cross-platform compatibility.
pub fn validate_filename(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.len() > 255 {
        return Err("Name is too long (max 255 bytes)".into());
    }

    let invalid_chars = ['/', '\0'];
    for c in invalid_chars {
        if name.contains(c) {
            return Err(format!("Name cannot contain '{}'", c.escape_default()));
        }
    }

    #[cfg(target_os = "windows")]
    {
        let windows_invalid = ['\\', ':', '*', '?', '"', '<', '>', '|'];
        for c in windows_invalid {
            if name.contains(c) {
                return Err(format!("Name cannot contain '{}'", c));
            }
        }
    }

    if name.starts_with(' ') || name.ends_with(' ') {
        return Err("Name cannot start or end with spaces".into());
    }

    if name.ends_with('.') {
        return Err("Name cannot end with a dot".into());
    }

    if name == "." || name == ".." {
        return Err("'.' and '..' are reserved names".into());
    }

    Ok(())
}
