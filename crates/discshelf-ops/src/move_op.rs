//! Async move operation with progress reporting.

use std::path::PathBuf;

use tokio::sync::mpsc;

use discshelf_core::{MoveConfig, TransferError, TransferOutcome, TransferProgress};

use crate::OPERATION_CHANNEL_SIZE;
use crate::mover::{Renamer, ResilientMover};

/// Event sent through the channel during a move.
#[derive(Debug)]
pub enum MoveEvent {
    /// Progress update from the copy fallback.
    Progress(TransferProgress),
    /// The move finished. Always the last event.
    Complete(TransferOutcome),
}

/// Start an async move of one file.
///
/// Returns a receiver scoped to this transfer: it yields progress events
/// and then exactly one [`MoveEvent::Complete`]. Intermediate updates are
/// dropped while the channel is full; the closing update waits for room.
/// Dropping the receiver does not stop or change the transfer. Must be
/// called within a Tokio runtime.
pub fn start_move(
    source: PathBuf,
    destination: PathBuf,
    config: MoveConfig,
) -> mpsc::Receiver<MoveEvent> {
    start_move_with(ResilientMover::new(config), source, destination)
}

/// Like [`start_move`], with a preconfigured mover.
pub fn start_move_with<R>(
    mover: ResilientMover<R>,
    source: PathBuf,
    destination: PathBuf,
) -> mpsc::Receiver<MoveEvent>
where
    R: Renamer + 'static,
{
    let (tx, rx) = mpsc::channel(OPERATION_CHANNEL_SIZE);

    tokio::spawn(async move {
        let progress_tx = tx.clone();
        let result = tokio::task::spawn_blocking(move || {
            mover.move_file(&source, &destination, |progress: &TransferProgress| {
                let event = MoveEvent::Progress(*progress);
                if progress.is_complete() {
                    // Wait for room so the closing event is never lost.
                    let _ = progress_tx.blocking_send(event);
                } else {
                    // A full or closed channel only loses this update.
                    let _ = progress_tx.try_send(event);
                }
            })
        })
        .await;

        let outcome = result.unwrap_or_else(|e| TransferOutcome::Failed {
            reason: TransferError::Task {
                message: e.to_string(),
            },
        });
        let _ = tx.send(MoveEvent::Complete(outcome)).await;
    });

    rx
}
