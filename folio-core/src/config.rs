//! Configuration parsing and management.

use folio_render::Widgets;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Production site URL used for absolute links when nothing else is configured
pub const DEFAULT_SITE_URL: &str = "https://scaryponens.com";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid site url '{0}': expected an absolute http(s) URL")]
    InvalidSiteUrl(String),

    #[error("Invalid section: {0}")]
    InvalidSection(String),
}

/// Main configuration struct matching the folio.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub markdown: MarkdownConfig,

    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    pub title: String,

    #[serde(default = "default_site_description")]
    pub description: String,

    /// Site base for absolute URLs
    #[serde(default = "default_site_url")]
    pub url: String,

    /// Target of the "back to home" link on every page
    #[serde(default = "default_home")]
    pub home: String,
}

fn default_site_title() -> String {
    String::from("scaryponens")
}

fn default_site_description() -> String {
    String::from("Thoughts and projects")
}

fn default_site_url() -> String {
    String::from(DEFAULT_SITE_URL)
}

fn default_home() -> String {
    String::from("/")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Production output root
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Root served by the dev server
    #[serde(default = "default_public")]
    pub public: PathBuf,
}

fn default_output() -> PathBuf {
    PathBuf::from("dist")
}

fn default_public() -> PathBuf {
    PathBuf::from("public")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Fail the build when any entry was skipped because of an error
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Feed location relative to each output root
    #[serde(default = "default_feed_path")]
    pub path: String,
}

fn default_true() -> bool {
    true
}

fn default_feed_path() -> String {
    String::from("feed.xml")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownConfig {
    #[serde(default = "default_highlight_theme")]
    pub highlight_theme: String,
}

fn default_highlight_theme() -> String {
    String::from("InspiredGitHub")
}

/// Kind of content a section holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Blog,
    Projects,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Blog => "blog",
            SectionKind::Projects => "projects",
        }
    }

    /// Whether undated entries fall back to the build date
    pub fn defaults_date(&self) -> bool {
        matches!(self, SectionKind::Blog)
    }
}

/// Filename date prefixes a section recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePrefixStyle {
    /// Compact, dashed, bracketed, then a loose date anywhere in the name
    Auto,
    /// `YYYYMMDD-slug`
    Compact,
    /// `YYYY-MM-DD-slug`
    Dashed,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Output subdirectory and feed URL segment
    pub name: String,

    pub kind: SectionKind,

    /// Directory holding the section's markdown files
    pub source: PathBuf,

    #[serde(default)]
    pub date_prefix: Option<DatePrefixStyle>,

    /// Include entries in the RSS feed
    #[serde(default)]
    pub feed: Option<bool>,

    /// Embedded stylesheet name
    #[serde(default)]
    pub theme: Option<String>,

    /// Stylesheet file, takes precedence over `theme`
    #[serde(default)]
    pub stylesheet: Option<PathBuf>,

    #[serde(flatten)]
    pub widgets: Widgets,
}

impl SectionConfig {
    pub fn new(name: impl Into<String>, kind: SectionKind, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            source: source.into(),
            date_prefix: None,
            feed: None,
            theme: None,
            stylesheet: None,
            widgets: Widgets::default(),
        }
    }

    pub fn date_prefix(&self) -> DatePrefixStyle {
        self.date_prefix.unwrap_or(match self.kind {
            SectionKind::Blog => DatePrefixStyle::Auto,
            SectionKind::Projects => DatePrefixStyle::None,
        })
    }

    pub fn in_feed(&self) -> bool {
        self.feed.unwrap_or(self.kind == SectionKind::Blog)
    }

    pub fn theme(&self) -> &str {
        self.theme.as_deref().unwrap_or(match self.kind {
            SectionKind::Blog => "github-markdown-dark",
            SectionKind::Projects => "blog",
        })
    }
}

fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("blog", SectionKind::Blog, "thoughts"),
        SectionConfig::new("projects", SectionKind::Projects, "projects"),
    ]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            description: default_site_description(),
            url: default_site_url(),
            home: default_home(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            public: default_public(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_feed_path(),
        }
    }
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            highlight_theme: default_highlight_theme(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            paths: PathsConfig::default(),
            build: BuildConfig::default(),
            feed: FeedConfig::default(),
            markdown: MarkdownConfig::default(),
            sections: default_sections(),
            config_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to built-in defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!("No config at {:?}; using built-in defaults", path);
            Ok(Self::default())
        }
    }

    /// Build a config whose relative paths resolve against `root`
    pub fn with_root(mut self, root: &Path) -> Self {
        self.config_path = Some(root.join("folio.yml"));
        self
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.site.url.trim();
        let valid_url = ["http://", "https://"]
            .iter()
            .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme));
        if !valid_url {
            return Err(ConfigError::InvalidSiteUrl(self.site.url.clone()));
        }

        let mut seen = HashSet::new();
        for section in &self.sections {
            let name = section.name.trim();
            if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
                return Err(ConfigError::InvalidSection(format!(
                    "'{}' is not a valid section name",
                    section.name
                )));
            }
            if !seen.insert(name) {
                return Err(ConfigError::InvalidSection(format!(
                    "duplicate section '{}'",
                    section.name
                )));
            }
        }

        Ok(())
    }

    /// Production output root, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Dev-server root, resolved relative to config file
    pub fn public_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.public)
    }

    /// Content directory of a section, resolved relative to config file
    pub fn source_dir(&self, section: &SectionConfig) -> PathBuf {
        self.resolve_path(&section.source)
    }

    /// Resolve an arbitrary path relative to the config file location
    pub fn resolve_relative(&self, path: &Path) -> PathBuf {
        self.resolve_path(path)
    }

    pub fn section(&self, name: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Site base without a trailing slash ("https://example.com")
    pub fn site_base(&self) -> String {
        self.site.url.trim().trim_end_matches('/').to_string()
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(config_path) = &self.config_path {
            if let Some(parent) = config_path.parent() {
                parent.join(path)
            } else {
                path.to_path_buf()
            }
        } else {
            path.to_path_buf()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.site.url, DEFAULT_SITE_URL);
        assert_eq!(config.paths.output, PathBuf::from("dist"));
        assert_eq!(config.paths.public, PathBuf::from("public"));
        assert!(config.feed.enabled);
        assert!(!config.build.strict);
        assert_eq!(config.sections.len(), 2);

        let blog = config.section("blog").unwrap();
        assert_eq!(blog.date_prefix(), DatePrefixStyle::Auto);
        assert!(blog.in_feed());
        assert_eq!(blog.theme(), "github-markdown-dark");

        let projects = config.section("projects").unwrap();
        assert_eq!(projects.date_prefix(), DatePrefixStyle::None);
        assert!(!projects.in_feed());
        assert_eq!(projects.theme(), "blog");
    }

    #[test]
    fn test_parse_sections_with_widgets() {
        let yaml = r#"
site:
  title: Test
  url: https://example.com/
sections:
  - name: blog
    kind: blog
    source: posts
    date_prefix: compact
    comments:
      repo: me/site
      repo_id: R_1
      category: Posts
      category_id: DIC_1
    claps:
      endpoint: https://claps.example.com
      script: /claps.js
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        config.validate().unwrap();

        assert_eq!(config.site.title, "Test");
        assert_eq!(config.site.description, "Thoughts and projects");
        assert_eq!(config.site_base(), "https://example.com");

        let blog = &config.sections[0];
        assert_eq!(blog.date_prefix(), DatePrefixStyle::Compact);
        let comments = blog.widgets.comments.as_ref().unwrap();
        assert_eq!(comments.repo, "me/site");
        assert_eq!(comments.theme, "preferred_color_scheme");
        assert_eq!(blog.widgets.claps.as_ref().unwrap().script, "/claps.js");
    }

    #[test]
    fn test_relative_paths_follow_config_file() {
        let config = Config::default().with_root(Path::new("/srv/site"));
        let blog = config.section("blog").unwrap();

        assert_eq!(config.output_dir(), PathBuf::from("/srv/site/dist"));
        assert_eq!(config.public_dir(), PathBuf::from("/srv/site/public"));
        assert_eq!(config.source_dir(blog), PathBuf::from("/srv/site/thoughts"));
    }

    #[test]
    fn test_rejects_relative_site_url() {
        let mut config = Config::default();
        config.site.url = "/".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSiteUrl(_))
        ));
    }

    #[test]
    fn test_rejects_duplicate_sections() {
        let mut config = Config::default();
        config
            .sections
            .push(SectionConfig::new("blog", SectionKind::Blog, "more"));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidSection(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/definitely/not/here/folio.yml").unwrap();
        assert_eq!(config.sections.len(), 2);
    }
}
