//! Byte-level matcher for identifier tokens.

use regex::bytes::Regex;

use discshelf_core::ScanError;

/// Matches `PREFIX_ddd.dd` with an optional `;1` volume suffix.
///
/// Matching runs over raw bytes with Unicode disabled, so every byte is one
/// character and binary content around the token is irrelevant.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    regex: Regex,
}

impl TokenPattern {
    /// Build a pattern for the given vendor prefixes.
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Result<Self, ScanError> {
        if prefixes.is_empty() {
            return Err(ScanError::InvalidConfig {
                message: "At least one identifier prefix is required".to_string(),
            });
        }

        let alternation = prefixes
            .iter()
            .map(|p| regex::escape(p.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let source = format!(r"(?-u)(?:{alternation})_[0-9]{{3}}\.[0-9]{{2}}(?:;1)?");

        let regex = Regex::new(&source).map_err(|e| ScanError::InvalidConfig {
            message: format!("Invalid identifier pattern: {e}"),
        })?;

        Ok(Self { regex })
    }

    /// First token in `haystack`, as text.
    pub fn find<'a>(&self, haystack: &'a [u8]) -> Option<&'a str> {
        self.regex
            .find(haystack)
            // The pattern only admits ASCII, so this never fails.
            .and_then(|m| std::str::from_utf8(m.as_bytes()).ok())
    }
}
