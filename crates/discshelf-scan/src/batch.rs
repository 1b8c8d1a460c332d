//! Parallel identification of many files.

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::debug;

use discshelf_core::{ScanError, ScanOutcome};

use crate::scanner::IdentifierScanner;

/// Result of scanning one file in a batch.
#[derive(Debug)]
pub struct BatchEntry {
    pub path: PathBuf,
    pub result: Result<ScanOutcome, ScanError>,
}

impl BatchEntry {
    pub fn is_identified(&self) -> bool {
        matches!(self.result, Ok(ScanOutcome::Identified(_)))
    }
}

/// Scan every path in parallel, returning results in input order.
///
/// Each file is scanned independently with its own handle; only the
/// scanner's catalog is shared.
pub fn scan_batch(scanner: &IdentifierScanner, paths: &[PathBuf]) -> Vec<BatchEntry> {
    debug!(files = paths.len(), "starting batch identification");

    paths
        .par_iter()
        .map(|path| BatchEntry {
            path: path.clone(),
            result: scanner.scan(path),
        })
        .collect()
}
