//! # folio-core
//!
//! Build pipeline for a markdown portfolio/blog site.
//!
//! Each configured section is read from a content directory, rendered to
//! standalone HTML pages, and indexed in a JSON manifest. Blog sections are
//! also syndicated through one RSS feed.

pub mod assets;
pub mod builder;
pub mod config;
pub mod feed;
pub mod frontmatter;
pub mod manifest;
pub mod markdown;
pub mod metadata;
pub mod models;
pub mod output;
pub mod slug;
pub mod source;
pub mod styles;
pub mod urls;

pub use builder::{BuildError, EntryError, SiteBuilder};
pub use config::{Config, ConfigError, DatePrefixStyle, SectionConfig, SectionKind};
pub use metadata::MetadataExtractor;
pub use models::{
    BuildReport, ContentEntry, DerivedMetadata, FeedItem, Frontmatter, ManifestEntry,
    SectionReport, SkippedEntry,
};
pub use slug::slugify;
