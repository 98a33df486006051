//! Frontmatter parsing from markdown files.

use crate::models::Frontmatter;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)\A---[ \t]*\r?\n(?:(.*?)\r?\n)??---[ \t]*(?:\r?\n|\z)(.*)\z")
            .expect("valid frontmatter regex")
    })
}

/// Parse frontmatter from markdown content
///
/// Returns a tuple of (frontmatter, markdown_body).
/// If no frontmatter is present, returns default frontmatter with the full content as body.
///
/// # Example
///
/// ```
/// use folio_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: My Post\ndate: 2025-01-01\n---\n# Hello World\n";
///
/// let (fm, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(fm.title.as_deref(), Some("My Post"));
/// assert_eq!(fm.date.as_deref(), Some("2025-01-01"));
/// assert!(body.starts_with("# Hello World"));
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(Frontmatter, String), FrontmatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(captures) = frontmatter_regex().captures(content) else {
        return Ok((Frontmatter::default(), content.to_string()));
    };

    let yaml = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let body = captures.get(2).map(|m| m.as_str()).unwrap_or_default();

    let frontmatter = if yaml.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    Ok((frontmatter, body.to_string()))
}

/// Like [`parse_frontmatter`], but a malformed block leaves the whole file as body
pub fn parse_frontmatter_lenient(content: &str, origin: &str) -> (Frontmatter, String) {
    match parse_frontmatter(content) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::warn!("Ignoring malformed frontmatter in {}: {}", origin, err);
            (Frontmatter::default(), content.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_frontmatter() {
        let content = r#"---
title: Test Post
tldr: A test post
date: 2025-01-01
---

# Hello World

This is the content."#;

        let (fm, body) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Test Post"));
        assert_eq!(fm.tldr.as_deref(), Some("A test post"));
        assert_eq!(fm.date.as_deref(), Some("2025-01-01"));
        assert!(body.contains("# Hello World"));
        assert!(body.contains("This is the content."));
    }

    #[test]
    fn test_scalar_values_are_coerced() {
        let content = "---\ntitle: 1984\nslug: true\n---\nBody";
        let (fm, _) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("1984"));
        assert_eq!(fm.slug.as_deref(), Some("true"));
    }

    #[test]
    fn test_yaml_style_draft_flags() {
        for (flag, expected) in [
            ("true", true),
            ("yes", true),
            ("On", true),
            ("no", false),
            ("false", false),
            ("0", false),
            ("maybe", true),
        ] {
            let content = format!("---\ntitle: Secret\ndraft: {}\n---\n# WIP\n", flag);
            let (fm, body) = parse_frontmatter(&content).unwrap();
            assert_eq!(fm.draft, expected, "draft: {}", flag);
            assert_eq!(fm.title.as_deref(), Some("Secret"));
            assert_eq!(body, "# WIP\n");
        }
    }

    #[test]
    fn test_mistyped_key_is_dropped_alone() {
        let content = "---\ntitle: [not, a, title]\nslug: kept\ndraft: true\n---\nBody";
        let (fm, body) = parse_frontmatter_lenient(content, "typed.md");
        assert_eq!(fm.title, None);
        assert_eq!(fm.slug.as_deref(), Some("kept"));
        assert!(fm.draft);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let content = "---\ntitle: Tagged\ntags: [rust, web]\n---\nBody";
        let (fm, _) = parse_frontmatter(content).unwrap();
        assert!(fm.extra.contains_key("tags"));
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let content = "# Just Content\n\nNo frontmatter here.";
        let (fm, body) = parse_frontmatter(content).unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter_block() {
        let content = "---\n---\n# Title\n\n---\n\nAfter a rule.";
        let (fm, body) = parse_frontmatter(content).unwrap();
        assert_eq!(fm, Frontmatter::default());
        assert!(body.starts_with("# Title"));
        assert!(body.contains("After a rule."));
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, body) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_invalid_yaml() {
        let content = r#"---
title: Test
invalid yaml: [unclosed
---

Content."#;

        assert!(parse_frontmatter(content).is_err());
    }

    #[test]
    fn test_lenient_falls_back_to_whole_file() {
        let content = "---\ntitle: [unclosed\n---\n\n# Real Title\n";
        let (fm, body) = parse_frontmatter_lenient(content, "broken.md");
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_non_mapping_frontmatter_is_malformed() {
        let content = "---\n- just\n- a list\n---\nBody";
        assert!(parse_frontmatter(content).is_err());
    }
}
