//! Game identifier normalization.
//!
//! Disc images carry their catalog code in the form `SLUS_123.45;1`. The
//! title catalog keys the same game as `SLUS-12345`.

/// Volume suffix that may trail an identifier inside an image.
pub const VOLUME_SUFFIX: &str = ";1";

/// Remove any trailing volume suffix from a raw token.
pub fn strip_volume_suffix(raw: &str) -> &str {
    raw.trim_end_matches(VOLUME_SUFFIX)
}

/// Turn a raw token into its catalog lookup key.
///
/// Drops the period, swaps the underscore separator for a hyphen, upper-cases
/// and strips the volume suffix. Applying it to its own output is a no-op.
pub fn normalize(raw: &str) -> String {
    let key = raw.replace('.', "").replace('_', "-").to_uppercase();
    strip_volume_suffix(&key).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize("SLUS_123.45"), "SLUS-12345");
        assert_eq!(normalize("SLUS_123.45;1"), "SLUS-12345");
        assert_eq!(normalize("scus_971.13"), "SCUS-97113");
    }

    #[test]
    fn test_strip_volume_suffix() {
        assert_eq!(strip_volume_suffix("SLES_500.03;1"), "SLES_500.03");
        assert_eq!(strip_volume_suffix("SLES_500.03"), "SLES_500.03");
    }

    #[test]
    fn test_normalize_already_normalized() {
        assert_eq!(normalize("SLUS-12345"), "SLUS-12345");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "[ -~]{0,24}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn suffix_variants_collapse(
            prefix in "(SLUS|SCES|SLPM|SCKA)",
            major in "[0-9]{3}",
            minor in "[0-9]{2}",
        ) {
            let bare = format!("{prefix}_{major}.{minor}");
            let suffixed = format!("{bare};1");
            prop_assert_eq!(normalize(&bare), normalize(&suffixed));
            prop_assert_eq!(normalize(&bare), format!("{prefix}-{major}{minor}"));
        }
    }
}
