//! URL slug generation
//!
//! Slugs keep letters, digits and combining marks from every script, so a
//! Bangla title produces a Bangla slug rather than an empty string.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Longest slug, in characters, before a uniqueness suffix
pub const SLUG_MAX_CHARS: usize = 80;

/// Used when a title contains nothing sluggable
pub const FALLBACK_SLUG: &str = "post";

/// Turn a title into a lowercase, hyphen-separated slug
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.nfkc().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || (is_combining_mark(c) && !slug.is_empty()) {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    let mut capped: String = slug.chars().take(SLUG_MAX_CHARS).collect();
    while capped.ends_with('-') {
        capped.pop();
    }

    if capped.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        capped
    }
}

/// `base` for the first attempt, `base-2`, `base-3`... afterwards
pub fn with_suffix(base: &str, attempt: u32) -> String {
    if attempt <= 1 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_title() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust   in 2024 -- a review "), "rust-in-2024-a-review");
    }

    #[test]
    fn test_bangla_title_keeps_marks() {
        assert_eq!(slugify("বাংলা ব্লগ"), "বাংলা-ব্লগ");
    }

    #[test]
    fn test_fullwidth_is_normalized() {
        assert_eq!(slugify("ＲＵＳＴ"), "rust");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(slugify("!!!"), FALLBACK_SLUG);
        assert_eq!(slugify(""), FALLBACK_SLUG);
    }

    #[test]
    fn test_length_cap() {
        let long = "word ".repeat(40);
        let slug = slugify(&long);
        assert!(slug.chars().count() <= SLUG_MAX_CHARS);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_with_suffix() {
        assert_eq!(with_suffix("guest-post", 1), "guest-post");
        assert_eq!(with_suffix("guest-post", 3), "guest-post-3");
    }
}
