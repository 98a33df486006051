//! Slug generation for legacy, title-style filenames.

use unicode_segmentation::UnicodeSegmentation;

/// Convert a title to a URL-safe slug
///
/// Lowercases, turns whitespace and underscores into hyphens, drops anything
/// that is not alphanumeric, and collapses/trims hyphens.
///
/// # Examples
///
/// ```
/// use folio_core::slugify;
///
/// assert_eq!(slugify("Some blog title"), "some-blog-title");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("C++ Programming"), "c-programming");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();
    let mut slug = String::with_capacity(lowercased.len());

    for grapheme in lowercased.graphemes(true) {
        let Some(c) = grapheme.chars().next() else {
            continue;
        };
        if c.is_whitespace() || c == '_' || c == '-' {
            if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_alphanumeric() {
            slug.push_str(grapheme);
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Some blog title"), "some-blog-title");
    }

    #[test]
    fn test_special_characters() {
        assert_eq!(slugify("Rust & Safety"), "rust-safety");
        assert_eq!(slugify("Node.js Tips"), "nodejs-tips");
        assert_eq!(slugify("What's new?"), "whats-new");
    }

    #[test]
    fn test_unicode() {
        assert_eq!(slugify("Café"), "café");
        assert_eq!(slugify("naïve approach"), "naïve-approach");
    }

    #[test]
    fn test_collapses_separators() {
        assert_eq!(slugify("  Hello   World  "), "hello-world");
        assert_eq!(slugify("-Leading_and_trailing-"), "leading-and-trailing");
    }

    #[test]
    fn test_empty_and_special_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
