//! File transfer engine for discshelf.
//!
//! This crate moves disc images between folders and volumes. A move is a
//! single rename when possible; when source and destination sit on different
//! devices it becomes a streamed copy followed by deleting the source, with
//! throttled progress reporting.
//!
//! Progress is always scoped to one transfer: either a callback passed to
//! [`ResilientMover::move_file`] or the receiver returned by [`start_move`].

mod copy;
mod move_op;
mod mover;
mod progress;
mod rename;

pub use copy::copy_with_progress;
pub use move_op::{MoveEvent, start_move, start_move_with};
pub use mover::{Renamer, ResilientMover, StdRenamer, is_cross_device, resolve_destination};
pub use progress::ProgressTracker;
pub use rename::{RenameError, game_file_name, rename_game_file, validate_filename};

pub use discshelf_core::{MoveConfig, TransferError, TransferOutcome, TransferProgress};

/// Default channel buffer size for transfer events.
pub const OPERATION_CHANNEL_SIZE: usize = 100;
