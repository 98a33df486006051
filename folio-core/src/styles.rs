//! Stylesheets inlined into generated pages.

use crate::config::{Config, SectionConfig};
use include_dir::{include_dir, Dir};
use std::fs;

// Embedded so the binary works without a checkout of the styles
static STYLES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../static/styles");

/// Theme used when a configured theme name is not embedded
pub const DEFAULT_THEME: &str = "github-markdown-dark";

/// Look up an embedded stylesheet by theme name (`blog`, `github-markdown-dark`)
pub fn embedded_stylesheet(theme: &str) -> Option<&'static str> {
    STYLES
        .get_file(format!("{}.css", theme))
        .and_then(|file| file.contents_utf8())
}

/// Names of every embedded theme
pub fn embedded_themes() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = STYLES
        .files()
        .filter_map(|file| file.path().file_stem().and_then(|s| s.to_str()))
        .collect();
    names.sort_unstable();
    names
}

/// Stylesheet for a section: its configured file, else its embedded theme
pub fn load_stylesheet(config: &Config, section: &SectionConfig) -> String {
    if let Some(path) = &section.stylesheet {
        let path = config.resolve_relative(path);
        match fs::read_to_string(&path) {
            Ok(css) => return css,
            Err(err) => tracing::warn!(
                "Failed to read stylesheet {:?} for section '{}': {}; using embedded theme",
                path,
                section.name,
                err
            ),
        }
    }

    let theme = section.theme();
    if let Some(css) = embedded_stylesheet(theme) {
        return css.to_string();
    }

    tracing::warn!(
        "Unknown theme '{}' for section '{}' (available: {}); using {}",
        theme,
        section.name,
        embedded_themes().join(", "),
        DEFAULT_THEME
    );
    embedded_stylesheet(DEFAULT_THEME)
        .unwrap_or_default()
        .to_string()
}
