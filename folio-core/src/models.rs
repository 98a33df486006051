//! Content model structs for entries, manifests, feeds, and build reports.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Frontmatter metadata from markdown files
///
/// Scalar values are coerced to strings, so `title: 1984` reads as `"1984"`.
/// A known key with an unusable value is dropped on its own; the rest of
/// the block still applies.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Frontmatter {
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub slug: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub excerpt: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub tldr: Option<String>,

    #[serde(default, deserialize_with = "lenient_bool")]
    pub draft: bool,

    /// Keys folio does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_yaml::Value;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) => Ok(Some(s)),
        other => {
            tracing::warn!("Ignoring non-scalar frontmatter value: {:?}", other);
            Ok(None)
        }
    }
}

/// Accepts YAML 1.1 style flags (`yes`, `off`, ...) as well as booleans
///
/// Anything unrecognised is treated as `true`, so a mistyped `draft` keeps
/// the entry unpublished.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Null => Some(false),
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().and_then(|n| match n {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "on" | "1" => Some(true),
            "false" | "no" | "n" | "off" | "0" | "" => Some(false),
            _ => None,
        },
        _ => None,
    };

    Ok(parsed.unwrap_or_else(|| {
        tracing::warn!("Unrecognised flag value {:?}; treating it as true", value);
        true
    }))
}

impl Frontmatter {
    fn non_empty(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn title(&self) -> Option<&str> {
        Self::non_empty(&self.title)
    }

    pub fn slug(&self) -> Option<&str> {
        Self::non_empty(&self.slug)
    }

    pub fn date(&self) -> Option<&str> {
        Self::non_empty(&self.date)
    }

    pub fn excerpt(&self) -> Option<&str> {
        Self::non_empty(&self.excerpt)
    }

    pub fn tldr(&self) -> Option<&str> {
        Self::non_empty(&self.tldr)
    }
}

/// One markdown source file, read once per build pass
#[derive(Debug, Clone)]
pub struct ContentEntry {
    pub source_path: PathBuf,

    /// File name without the `.md` extension
    pub stem: String,

    pub raw_text: String,
    pub frontmatter: Frontmatter,

    /// Markdown with the frontmatter block removed
    pub body: String,
}

impl ContentEntry {
    /// Split raw text into frontmatter and body; malformed frontmatter is ignored
    pub fn new(source_path: PathBuf, raw_text: String) -> Self {
        let stem = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let origin = source_path.display().to_string();
        let (frontmatter, body) = crate::frontmatter::parse_frontmatter_lenient(&raw_text, &origin);

        Self {
            source_path,
            stem,
            raw_text,
            frontmatter,
            body,
        }
    }
}

/// Title, slug, date and excerpt computed for an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedMetadata {
    pub title: String,
    pub slug: String,
    pub date: Option<NaiveDate>,
    pub excerpt: String,

    /// Output file name (`<stem>.html`)
    pub filename: String,
}

/// One row of a section's `manifest.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub title: String,
    pub slug: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    pub excerpt: String,
    pub filename: String,
}

impl From<&DerivedMetadata> for ManifestEntry {
    fn from(meta: &DerivedMetadata) -> Self {
        Self {
            title: meta.title.clone(),
            slug: meta.slug.clone(),
            date: meta.date,
            excerpt: meta.excerpt.clone(),
            filename: meta.filename.clone(),
        }
    }
}

/// One `<item>` of the RSS feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,

    /// Canonical absolute URL of the rendered page
    pub link: String,

    /// Full page body with URLs made absolute
    pub absolute_html: String,

    pub excerpt: String,
    pub date: Option<NaiveDate>,
}

/// An entry that made it through the pipeline
#[derive(Debug, Clone)]
pub struct RenderedEntry {
    pub metadata: DerivedMetadata,

    /// Rendered markdown body (without the page shell)
    pub html: String,
}

/// An entry dropped because of an error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of building one section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionReport {
    pub name: String,
    pub pages_written: usize,
    pub drafts: usize,
    pub skipped: Vec<SkippedEntry>,
    pub manifest_written: bool,
}

impl SectionReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages_written: 0,
            drafts: 0,
            skipped: Vec::new(),
            manifest_written: false,
        }
    }
}

/// Outcome of a whole build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub sections: Vec<SectionReport>,
    pub feed_items: usize,
    pub feed_written: bool,
}

impl BuildReport {
    pub fn pages_written(&self) -> usize {
        self.sections.iter().map(|s| s.pages_written).sum()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SkippedEntry> {
        self.sections.iter().flat_map(|s| s.skipped.iter())
    }

    pub fn section(&self, name: &str) -> Option<&SectionReport> {
        self.sections.iter().find(|s| s.name == name)
    }
}
