//! Windowed identifier scanner.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use discshelf_core::{ScanConfig, ScanError, ScanMatch, ScanOutcome, normalize};

use crate::catalog::IdentifierCatalog;
use crate::pattern::TokenPattern;

/// Streams files in fixed windows looking for a game identifier.
///
/// Each window is searched together with the last `overlap` bytes of the
/// previous search buffer, so a token cut by a window edge is still seen
/// whole. The first token found wins.
#[derive(Debug, Clone)]
pub struct IdentifierScanner {
    config: ScanConfig,
    pattern: TokenPattern,
    catalog: Arc<IdentifierCatalog>,
}

impl IdentifierScanner {
    /// Create a scanner with its own catalog built from the config's
    /// candidate paths.
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        let catalog = Arc::new(IdentifierCatalog::new(config.catalog_candidates.clone()));
        Self::with_catalog(config, catalog)
    }

    /// Create a scanner sharing an existing catalog.
    pub fn with_catalog(
        config: ScanConfig,
        catalog: Arc<IdentifierCatalog>,
    ) -> Result<Self, ScanError> {
        config
            .validate()
            .map_err(|message| ScanError::InvalidConfig { message })?;
        let pattern = TokenPattern::new(&config.prefixes)?;
        Ok(Self {
            config,
            pattern,
            catalog,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The catalog titles are resolved against.
    pub fn catalog(&self) -> &Arc<IdentifierCatalog> {
        &self.catalog
    }

    /// Scan a file on disk.
    ///
    /// Failing to open or read the file is an error; reading it to the end
    /// without finding a token is [`ScanOutcome::Unidentified`].
    pub fn scan(&self, path: impl AsRef<Path>) -> Result<ScanOutcome, ScanError> {
        let path = path.as_ref();
        let start = Instant::now();

        let file = File::open(path).map_err(|e| ScanError::io(path, e))?;
        let metadata = file.metadata().map_err(|e| ScanError::io(path, e))?;
        if !metadata.is_file() {
            return Err(ScanError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        debug!(path = %path.display(), size = metadata.len(), "scanning for game id");

        let outcome = self
            .scan_reader(file)
            .map_err(|e| ScanError::io(path, e))?;

        match &outcome {
            ScanOutcome::Identified(m) => info!(
                path = %path.display(),
                game_id = m.normalized_identifier(),
                title = m.title().unwrap_or_default(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "identified game"
            ),
            ScanOutcome::Unidentified => info!(
                path = %path.display(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "no game id found"
            ),
        }

        Ok(outcome)
    }

    /// Scan any byte stream, reading it sequentially from its current
    /// position.
    pub fn scan_reader<R: Read>(&self, reader: R) -> io::Result<ScanOutcome> {
        let Some(token) = self.find_token(reader)? else {
            return Ok(ScanOutcome::Unidentified);
        };

        let title = self.catalog.lookup(&normalize(&token)).map(str::to_string);
        Ok(ScanOutcome::Identified(ScanMatch::new(token, title)))
    }

    fn find_token<R: Read>(&self, mut reader: R) -> io::Result<Option<String>> {
        let window_size = self.config.window_size;
        let overlap = self.config.overlap;

        // Carry bytes at the front, the freshly read window after them.
        let mut buffer: Vec<u8> = Vec::with_capacity(overlap + window_size);
        let mut windows = 0u64;

        loop {
            let carry_len = buffer.len();
            buffer.resize(carry_len + window_size, 0);
            let read = fill_window(&mut reader, &mut buffer[carry_len..])?;
            buffer.truncate(carry_len + read);

            if read == 0 {
                debug!(windows, "reached end of input");
                return Ok(None);
            }
            windows += 1;

            if let Some(token) = self.pattern.find(&buffer) {
                debug!(window = windows, token, "matched game id");
                return Ok(Some(token.to_string()));
            }

            if read < window_size {
                debug!(windows, "reached end of input");
                return Ok(None);
            }

            let keep = buffer.len().min(overlap);
            buffer.drain(..buffer.len() - keep);
        }
    }
}

/// Read until `buf` is full or the input ends.
fn fill_window<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
