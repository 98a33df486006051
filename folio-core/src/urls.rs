//! Absolute URL rewriting for syndicated HTML.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(^|[\s"'/])(src|href)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid url attribute regex")
});

/// How an attribute value relates to the site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Has a scheme (`https:`, `mailto:`) or is protocol-relative
    Absolute,
    /// `#anchor`
    Fragment,
    /// `assets/...` or `./assets/...`, relative to the section directory
    SectionAsset,
    /// `/path`
    RootRelative,
    /// Anything else
    Relative,
}

pub fn classify_url(url: &str) -> UrlKind {
    if url.starts_with("//") || has_scheme(url) {
        UrlKind::Absolute
    } else if url.starts_with('#') {
        UrlKind::Fragment
    } else if url.starts_with("assets/") || url.starts_with("./assets/") {
        UrlKind::SectionAsset
    } else if url.starts_with('/') {
        UrlKind::RootRelative
    } else {
        UrlKind::Relative
    }
}

/// RFC 3986 scheme: a letter, then letters, digits, `+`, `-` or `.`, then `:`
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Rewrite one attribute value; `None` when it stays as is
pub fn absolutize_url(url: &str, site_base: &str, section: &str) -> Option<String> {
    let base = site_base.trim_end_matches('/');
    match classify_url(url) {
        UrlKind::SectionAsset => {
            let rest = url.trim_start_matches("./");
            Some(format!("{}/{}/{}", base, section, rest))
        }
        UrlKind::RootRelative => Some(format!("{}{}", base, url)),
        UrlKind::Absolute | UrlKind::Fragment | UrlKind::Relative => None,
    }
}

/// Rewrite every `src`/`href` in `html` to an absolute URL under `site_base`
///
/// Values are classified once, so running this on its own output changes nothing.
///
/// # Examples
///
/// ```
/// use folio_core::urls::absolutize_urls;
///
/// let html = absolutize_urls(r#"<a href="/about">About</a>"#, "https://example.com", "blog");
/// assert_eq!(html, r#"<a href="https://example.com/about">About</a>"#);
/// ```
pub fn absolutize_urls(html: &str, site_base: &str, section: &str) -> String {
    ATTR_RE
        .replace_all(html, |caps: &Captures| {
            let (lead, attr) = (&caps[1], &caps[2]);
            let (value, quote) = match (caps.get(3), caps.get(4)) {
                (Some(v), _) => (v.as_str(), '"'),
                (None, Some(v)) => (v.as_str(), '\''),
                (None, None) => return caps[0].to_string(),
            };
            match absolutize_url(value, site_base, section) {
                Some(url) => format!("{}{}={}{}{}", lead, attr, quote, url, quote),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: &str = "https://example.com";

    #[test]
    fn test_classification() {
        assert_eq!(classify_url("https://x.io/a"), UrlKind::Absolute);
        assert_eq!(classify_url("mailto:me@x.io"), UrlKind::Absolute);
        assert_eq!(classify_url("//cdn.x.io/a.js"), UrlKind::Absolute);
        assert_eq!(classify_url("#top"), UrlKind::Fragment);
        assert_eq!(classify_url("assets/a.png"), UrlKind::SectionAsset);
        assert_eq!(classify_url("./assets/a.png"), UrlKind::SectionAsset);
        assert_eq!(classify_url("/about"), UrlKind::RootRelative);
        assert_eq!(classify_url("other.html"), UrlKind::Relative);
        assert_eq!(classify_url("1:2"), UrlKind::Relative);
    }

    #[test]
    fn test_root_relative_link() {
        let html = absolutize_urls(r#"<a href="/about">x</a>"#, BASE, "blog");
        assert_eq!(html, r#"<a href="https://example.com/about">x</a>"#);
        assert_eq!(absolutize_urls(&html, BASE, "blog"), html);
    }

    #[test]
    fn test_asset_reference_uses_section() {
        let html = absolutize_urls(
            r#"<img src="assets/cat.png"><img src='./assets/dog.png'>"#,
            BASE,
            "blog",
        );
        assert_eq!(
            html,
            r#"<img src="https://example.com/blog/assets/cat.png"><img src='https://example.com/blog/assets/dog.png'>"#
        );
    }

    #[test]
    fn test_untouched_values() {
        let html = r##"<a href="#notes">n</a><a href="https://other.org/">o</a><a href="page.html">p</a>"##;
        assert_eq!(absolutize_urls(html, BASE, "blog"), html);
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let html = absolutize_urls(r#"<a href="/feed.xml">f</a>"#, "https://example.com/", "blog");
        assert_eq!(html, r#"<a href="https://example.com/feed.xml">f</a>"#);
    }

    #[test]
    fn test_data_attributes_are_not_matched() {
        let html = r#"<div data-href="/x"></div>"#;
        assert_eq!(absolutize_urls(html, BASE, "blog"), html);
    }

    proptest! {
        #[test]
        fn rewriting_is_idempotent(
            paths in proptest::collection::vec(
                prop_oneof![
                    "/[a-z0-9/._-]{0,12}",
                    "assets/[a-z0-9/._-]{0,12}",
                    "\\./assets/[a-z]{0,8}",
                    "#[a-z]{0,6}",
                    "https://[a-z]{1,8}\\.org/[a-z]{0,6}",
                    "[a-z]{1,8}\\.html",
                ],
                0..6,
            ),
        ) {
            let html: String = paths
                .iter()
                .map(|p| format!("<a href=\"{}\">x</a><img src='{}'>", p, p))
                .collect();
            let once = absolutize_urls(&html, BASE, "blog");
            let twice = absolutize_urls(&once, BASE, "blog");
            prop_assert_eq!(once, twice);
        }
    }
}
