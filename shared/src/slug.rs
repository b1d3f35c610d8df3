//! Slug derivation and validation.
//!
//! Slugs are lowercase alphanumeric runs joined by single hyphens
//! (`my-article-7`). They identify articles, categories and static pages
//! and never change after creation.

/// Check a string against the slug shape `[a-z0-9]+(-[a-z0-9]+)*`.
pub fn is_valid(slug: &str) -> bool {
    if slug.is_empty() {
        return false;
    }
    let mut prev_hyphen = true; // leading hyphen is invalid
    for ch in slug.chars() {
        match ch {
            'a'..='z' | '0'..='9' => prev_hyphen = false,
            '-' if !prev_hyphen => prev_hyphen = true,
            _ => return false,
        }
    }
    !prev_hyphen // trailing hyphen is invalid
}

/// Derive a slug from free-form text: lowercase, every run of
/// non-alphanumeric characters collapsed to one hyphen, leading/trailing
/// hyphens trimmed. Returns an empty string when the input has no
/// alphanumeric characters at all; callers fall back to a generated slug.
pub fn derive(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_slugs() {
        for slug in ["a", "hi", "my-article", "a1-b2-c3", "2024"] {
            assert!(is_valid(slug), "{slug} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_slugs() {
        for slug in ["", "-a", "a-", "a--b", "My-Article", "héllo", "a b"] {
            assert!(!is_valid(slug), "{slug} should be invalid");
        }
    }

    #[test]
    fn derivation_collapses_and_trims() {
        assert_eq!(derive("Hi"), "hi");
        assert_eq!(derive("  The  Water Cycle! "), "the-water-cycle");
        assert_eq!(derive("C'est -- la vie"), "c-est-la-vie");
        assert_eq!(derive("!!!"), "");
    }

    #[test]
    fn derivation_is_deterministic_and_valid() {
        let first = derive("Photosynthesis: An Introduction");
        let second = derive("Photosynthesis: An Introduction");
        assert_eq!(first, second);
        assert!(is_valid(&first));
    }
}
