//! Canonical display-name normalization.
//!
//! The server derives every artifact name from the uploaded file's stem by
//! appending `_encrypted` and then `_preview`. This is the only place the
//! client strips those tags; it is applied once when items enter the cache
//! and when the HTTP client derives the base name a delete refers to.

/// Tag appended to the preview artifact.
pub const PREVIEW_SUFFIX: &str = "_preview";

/// Tag appended to the encrypted artifact.
pub const ENCRYPTED_SUFFIX: &str = "_encrypted";

/// Strip a trailing `_preview` tag, then a trailing `_encrypted` tag.
///
/// The function is idempotent: a normalized name normalizes to itself.
pub fn normalize_item_name(raw: &str) -> String {
    let name = raw.strip_suffix(PREVIEW_SUFFIX).unwrap_or(raw);
    let name = name.strip_suffix(ENCRYPTED_SUFFIX).unwrap_or(name);
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_both_tags() {
        assert_eq!(normalize_item_name("beach_encrypted_preview"), "beach");
    }

    #[test]
    fn test_strips_single_tag() {
        assert_eq!(normalize_item_name("beach_preview"), "beach");
        assert_eq!(normalize_item_name("beach_encrypted"), "beach");
    }

    #[test]
    fn test_keeps_inner_tags() {
        assert_eq!(
            normalize_item_name("my_preview_shots_encrypted_preview"),
            "my_preview_shots"
        );
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_item_name("a_encrypted_preview");
        assert_eq!(normalize_item_name(&once), once);
    }

    #[test]
    fn test_plain_name_untouched() {
        assert_eq!(normalize_item_name("sunset"), "sunset");
    }
}
