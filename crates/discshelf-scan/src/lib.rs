//! Game identifier scanning engine for discshelf.
//!
//! This crate finds the catalog code a PS2 disc image carries in its raw
//! bytes and resolves it to a title.
//!
//! # Overview
//!
//! - **Bounded memory**: files are read in fixed windows, so multi-gigabyte
//!   images cost one window of RAM
//! - **Boundary safe**: the tail of each window is carried into the next so
//!   tokens split across a window edge are still found
//! - **Shared catalog**: the title list is loaded at most once per
//!   [`IdentifierCatalog`] and shared by every scanner holding it
//!
//! # Example
//!
//! ```rust,no_run
//! use discshelf_scan::{IdentifierScanner, ScanConfig, ScanOutcome};
//!
//! let scanner = IdentifierScanner::new(ScanConfig::default()).unwrap();
//! match scanner.scan("/games/DVD/game.iso").unwrap() {
//!     ScanOutcome::Identified(m) => println!("{} {:?}", m.normalized_identifier(), m.title()),
//!     ScanOutcome::Unidentified => println!("no identifier"),
//! }
//! ```

mod batch;
mod catalog;
mod pattern;
mod scanner;

pub use batch::{BatchEntry, scan_batch};
pub use catalog::{CatalogSource, FsCatalogSource, IdentifierCatalog, parse_catalog};
pub use pattern::TokenPattern;
pub use scanner::IdentifierScanner;

// Re-export core types for convenience
pub use discshelf_core::{ScanConfig, ScanError, ScanMatch, ScanOutcome, normalize};
