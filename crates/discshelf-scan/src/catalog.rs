//! Offline identifier to title catalog.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::{debug, info, warn};

/// Where catalog text comes from.
///
/// The filesystem is the only production source; the trait exists so the
/// loader can be pointed at something observable.
pub trait CatalogSource: Send + Sync {
    /// Read the full text of one candidate.
    fn read(&self, path: &Path) -> io::Result<String>;
}

/// Reads catalog candidates from disk. Invalid UTF-8 is replaced, not rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsCatalogSource;

impl CatalogSource for FsCatalogSource {
    fn read(&self, path: &Path) -> io::Result<String> {
        let bytes = fs::read(path)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Immutable map from normalized identifier to game title.
///
/// The first lookup loads the first candidate that parses to at least one
/// entry. The result, including "no catalog available", is kept for the life
/// of this object, so later lookups never touch the source again. Concurrent
/// first lookups block on the same load.
pub struct IdentifierCatalog {
    candidates: Vec<PathBuf>,
    source: Box<dyn CatalogSource>,
    entries: OnceLock<Option<HashMap<String, String>>>,
}

impl IdentifierCatalog {
    /// Catalog backed by files on disk.
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self::with_source(candidates, FsCatalogSource)
    }

    /// Catalog backed by a custom source.
    pub fn with_source(candidates: Vec<PathBuf>, source: impl CatalogSource + 'static) -> Self {
        Self {
            candidates,
            source: Box::new(source),
            entries: OnceLock::new(),
        }
    }

    /// Catalog that is already loaded with the given entries.
    pub fn from_entries(entries: HashMap<String, String>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(id, title)| (id.to_uppercase(), title))
            .collect::<HashMap<_, _>>();
        let catalog = Self::new(Vec::new());
        let loaded = if entries.is_empty() { None } else { Some(entries) };
        // Freshly created, so the cell is empty.
        let _ = catalog.entries.set(loaded);
        catalog
    }

    /// Title for a normalized identifier.
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.entries()?.get(&id.to_uppercase()).map(String::as_str)
    }

    /// Whether a catalog could be loaded. Triggers the load.
    pub fn is_available(&self) -> bool {
        self.entries().is_some()
    }

    /// Number of entries. Triggers the load.
    pub fn len(&self) -> usize {
        self.entries().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the load has already happened.
    pub fn is_loaded(&self) -> bool {
        self.entries.get().is_some()
    }

    fn entries(&self) -> Option<&HashMap<String, String>> {
        self.entries.get_or_init(|| self.load()).as_ref()
    }

    fn load(&self) -> Option<HashMap<String, String>> {
        for candidate in &self.candidates {
            let content = match self.source.read(candidate) {
                Ok(content) => content,
                Err(e) => {
                    debug!(path = %candidate.display(), error = %e, "catalog candidate unreadable");
                    continue;
                }
            };

            let entries = parse_catalog(&content);
            if entries.is_empty() {
                debug!(path = %candidate.display(), "catalog candidate has no entries");
                continue;
            }

            info!(path = %candidate.display(), entries = entries.len(), "loaded game catalog");
            return Some(entries);
        }

        warn!(
            candidates = self.candidates.len(),
            "no game catalog available, titles will be missing"
        );
        None
    }
}

impl std::fmt::Debug for IdentifierCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierCatalog")
            .field("candidates", &self.candidates)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Parse catalog text: `IDENTIFIER<whitespace>TITLE WORDS...` per line.
///
/// Identifiers are upper-cased and title words joined by single spaces.
/// Blank lines and lines without a title are skipped.
pub fn parse_catalog(content: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();

    for line in content.lines() {
        let mut parts = line.split_whitespace();
        let Some(id) = parts.next() else {
            continue;
        };
        let title = parts.collect::<Vec<_>>().join(" ");
        if title.is_empty() {
            continue;
        }
        entries.insert(id.to_uppercase(), title);
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        reads: Arc<AtomicUsize>,
        content: Option<String>,
    }

    impl CatalogSource for CountingSource {
        fn read(&self, _path: &Path) -> io::Result<String> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.content
                .clone()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "missing"))
        }
    }

    #[test]
    fn test_parse_catalog() {
        let entries = parse_catalog(
            "SLUS-12345   Some  Game Title\r\n\n   \nslus-99999 Lower Case\nSCES-00001\n",
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["SLUS-12345"], "Some Game Title");
        assert_eq!(entries["SLUS-99999"], "Lower Case");
        assert!(!entries.contains_key("SCES-00001"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let catalog = IdentifierCatalog::from_entries(HashMap::from([(
            "slus-12345".to_string(),
            "Game".to_string(),
        )]));
        assert!(catalog.is_loaded());
        assert_eq!(catalog.lookup("SLUS-12345"), Some("Game"));
        assert_eq!(catalog.lookup("slus-12345"), Some("Game"));
        assert_eq!(catalog.lookup("SLUS-00000"), None);
    }

    #[test]
    fn test_failed_load_is_cached() {
        let reads = Arc::new(AtomicUsize::new(0));
        let catalog = IdentifierCatalog::with_source(
            vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")],
            CountingSource {
                reads: reads.clone(),
                content: None,
            },
        );

        assert!(!catalog.is_loaded());
        assert_eq!(catalog.lookup("SLUS-12345"), None);
        assert_eq!(reads.load(Ordering::SeqCst), 2);

        assert_eq!(catalog.lookup("SLUS-12345"), None);
        assert!(!catalog.is_available());
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_candidate_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.txt");
        let full = dir.path().join("full.txt");
        fs::write(&empty, "\n\nNOTITLE\n").unwrap();
        fs::write(&full, "SCUS-97113 Racing Game\n").unwrap();

        let catalog = IdentifierCatalog::new(vec![
            dir.path().join("missing.txt"),
            empty,
            full,
        ]);
        assert_eq!(catalog.lookup("SCUS-97113"), Some("Racing Game"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_concurrent_first_lookups_load_once() {
        let reads = Arc::new(AtomicUsize::new(0));
        let catalog = Arc::new(IdentifierCatalog::with_source(
            vec![PathBuf::from("list.txt")],
            CountingSource {
                reads: reads.clone(),
                content: Some("SLUS-12345 Game".to_string()),
            },
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || catalog.lookup("SLUS-12345").map(str::to_string))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("Game"));
        }
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }
}
