//! Rename-first file mover with a copy fallback across devices.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use discshelf_core::{MoveConfig, TransferError, TransferOutcome, TransferProgress};

use crate::copy::copy_with_progress;

#[cfg(unix)]
const EXDEV: i32 = 18;

#[cfg(windows)]
const ERROR_NOT_SAME_DEVICE: i32 = 17;

/// Performs the atomic rename step of a move.
pub trait Renamer: Send + Sync {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// Renames through the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdRenamer;

impl Renamer for StdRenamer {
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// Whether a rename failed because source and destination are on
/// different devices or volumes.
pub fn is_cross_device(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::CrossesDevices {
        return true;
    }
    match err.raw_os_error() {
        #[cfg(unix)]
        Some(code) => code == EXDEV,
        #[cfg(windows)]
        Some(code) => code == ERROR_NOT_SAME_DEVICE,
        _ => false,
    }
}

/// Work out where `source` should land.
///
/// An existing directory receives the file under its current name. Anything
/// else is taken as the target file path, and its parent directories are
/// created.
pub fn resolve_destination(source: &Path, destination: &Path) -> Result<PathBuf, TransferError> {
    if destination.is_dir() {
        let name = source.file_name().ok_or_else(|| TransferError::InvalidSource {
            path: source.to_path_buf(),
        })?;
        return Ok(destination.join(name));
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TransferError::DestinationSetup {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    Ok(destination.to_path_buf())
}

/// Moves one file at a time, falling back to copy-then-delete when a rename
/// cannot cross devices.
#[derive(Debug, Clone, Default)]
pub struct ResilientMover<R = StdRenamer> {
    config: MoveConfig,
    renamer: R,
}

impl ResilientMover<StdRenamer> {
    pub fn new(config: MoveConfig) -> Self {
        Self::with_renamer(config, StdRenamer)
    }
}

impl<R: Renamer> ResilientMover<R> {
    /// Create a mover using a custom rename step.
    pub fn with_renamer(config: MoveConfig, renamer: R) -> Self {
        Self { config, renamer }
    }

    pub fn config(&self) -> &MoveConfig {
        &self.config
    }

    /// Move `source` to `destination`, which may be a directory or a file
    /// path.
    ///
    /// `on_progress` only hears about the copy fallback; a plain rename
    /// reports nothing. The source is removed only after the copy is fully
    /// written.
    pub fn move_file<F>(
        &self,
        source: &Path,
        destination: &Path,
        mut on_progress: F,
    ) -> TransferOutcome
    where
        F: FnMut(&TransferProgress),
    {
        let target = match resolve_destination(source, destination) {
            Ok(target) => target,
            Err(e) => {
                warn!(source = %source.display(), error = %e, "cannot prepare destination");
                return e.into();
            }
        };

        match self.renamer.rename(source, &target) {
            Ok(()) => {
                info!(source = %source.display(), target = %target.display(), "renamed");
                return TransferOutcome::Renamed { final_path: target };
            }
            Err(e) if is_cross_device(&e) => {
                debug!(
                    source = %source.display(),
                    target = %target.display(),
                    "rename crosses devices, copying instead"
                );
            }
            Err(e) => {
                warn!(
                    source = %source.display(),
                    target = %target.display(),
                    error = %e,
                    "rename failed"
                );
                return TransferError::Rename {
                    destination: target,
                    source: e,
                }
                .into();
            }
        }

        let start = Instant::now();
        let copied = match copy_with_progress(source, &target, &self.config, &mut on_progress) {
            Ok(copied) => copied,
            Err(e) => {
                warn!(source = %source.display(), error = %e, "copy failed, source kept");
                return e.into();
            }
        };

        if let Err(e) = fs::remove_file(source) {
            warn!(source = %source.display(), error = %e, "copied but source could not be removed");
            return TransferError::RemoveSource {
                path: source.to_path_buf(),
                destination: target,
                source: e,
            }
            .into();
        }

        info!(
            source = %source.display(),
            target = %target.display(),
            bytes = copied,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "moved across devices"
        );
        TransferOutcome::Copied { final_path: target }
    }

    /// Move without observing progress.
    pub fn move_file_quiet(&self, source: &Path, destination: &Path) -> TransferOutcome {
        self.move_file(source, destination, |_: &TransferProgress| {})
    }
}
