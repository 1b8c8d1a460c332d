//! Core types and traits for discshelf.
//!
//! This crate provides the data model shared by the scanner and the file
//! operations engine: game identifiers, scan matches, transfer progress and
//! outcomes, configuration, and the response shapes handed to front-ends.

mod config;
mod error;
mod id;
mod model;
mod response;

pub use config::{
    DEFAULT_GAME_ID_PREFIXES, MoveConfig, MoveConfigBuilder, ScanConfig, ScanConfigBuilder,
    default_catalog_candidates,
};
pub use error::{ScanError, TransferError};
pub use id::{VOLUME_SUFFIX, normalize, strip_volume_suffix};
pub use model::{ScanMatch, ScanOutcome, TransferOutcome, TransferProgress};
pub use response::{MoveResponse, ProgressPayload, ScanErrorKind, ScanResponse};
