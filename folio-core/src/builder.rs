//! Site building logic - runs every configured section through the pipeline.

use crate::{
    assets::copy_assets,
    config::{Config, ConfigError, SectionConfig},
    feed::FeedBuilder,
    manifest::Manifest,
    markdown::MarkdownRenderer,
    metadata::MetadataExtractor,
    models::*,
    output::{OutputRoots, WriteError},
    source::{discover_markdown_files, read_entry},
    styles::load_stylesheet,
};
use chrono::{Local, NaiveDate};
use folio_render::{assemble_page, Page, RenderError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to create {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("Failed to serialize manifest for section '{section}': {source}")]
    Serialize {
        section: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown section: {0}")]
    UnknownSection(String),

    #[error("{count} entries failed to build")]
    EntriesFailed { count: usize },
}

/// Failure confined to a single entry; the entry is skipped
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is not valid UTF-8: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Failed to render {path:?}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Main site builder
pub struct SiteBuilder {
    config: Config,
    renderer: MarkdownRenderer,
    today: NaiveDate,
    only: Option<Vec<String>>,
}

/// Per-section values shared by every entry
struct SectionContext<'a> {
    section: &'a SectionConfig,
    extractor: MetadataExtractor,
    stylesheet: String,
    feed_href: Option<String>,
}

impl SiteBuilder {
    pub fn new(config: Config) -> Self {
        let renderer = MarkdownRenderer::new(&config.markdown.highlight_theme);
        Self {
            config,
            renderer,
            today: Local::now().date_naive(),
            only: None,
        }
    }

    /// Date given to undated blog entries (defaults to the local date)
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Restrict the build to the named sections
    pub fn only_sections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.only = if names.is_empty() { None } else { Some(names) };
        self
    }

    fn is_selected(&self, section: &SectionConfig) -> bool {
        self.only
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| *n == section.name))
    }

    fn output_roots(&self) -> OutputRoots {
        OutputRoots::new([self.config.output_dir(), self.config.public_dir()])
    }

    /// Build every selected section, then the feed
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        if let Some(names) = &self.only {
            if let Some(unknown) = names.iter().find(|n| self.config.section(n).is_none()) {
                return Err(BuildError::UnknownSection(unknown.clone()));
            }
        }

        tracing::info!("Building site: {}", self.config.site.title);

        let roots = self.output_roots();
        let mut feed = FeedBuilder::new(&self.config);
        let mut report = BuildReport::default();
        let mut feed_complete = true;

        for section in &self.config.sections {
            if !self.is_selected(section) {
                feed_complete &= !section.in_feed();
                tracing::debug!("Section '{}' not selected; skipping", section.name);
                continue;
            }
            let section_report = self.build_section(section, &roots, &mut feed)?;
            report.sections.push(section_report);
        }

        report.feed_items = feed.len();
        report.feed_written = self.write_feed(&feed, &roots, feed_complete)?;

        tracing::info!("✓ Built {} pages", report.pages_written());
        for root in roots.roots() {
            tracing::info!("✓ Output written to {:?}", root);
        }

        let failed = report.skipped().count();
        if failed > 0 {
            tracing::warn!("{} entries were skipped because of errors", failed);
            if self.config.build.strict {
                return Err(BuildError::EntriesFailed { count: failed });
            }
        }

        Ok(report)
    }

    fn write_feed(
        &self,
        feed: &FeedBuilder,
        roots: &OutputRoots,
        feed_complete: bool,
    ) -> Result<bool, BuildError> {
        let path = &self.config.feed.path;
        if !self.config.feed.enabled {
            tracing::info!("Feed disabled; skipping {}", path);
            return Ok(false);
        }
        if !feed_complete {
            tracing::info!("Not every feed section was built; skipping {}", path);
            return Ok(false);
        }
        if feed.is_empty() {
            tracing::info!("No feed entries; skipping {}", path);
            return Ok(false);
        }

        roots.write(path, feed.render().as_bytes())?;
        tracing::info!("✓ Generated: {} ({} items)", path, feed.len());
        Ok(true)
    }

    fn build_section(
        &self,
        section: &SectionConfig,
        roots: &OutputRoots,
        feed: &mut FeedBuilder,
    ) -> Result<SectionReport, BuildError> {
        let span = tracing::info_span!("section", name = %section.name);
        let _enter = span.enter();

        let mut report = SectionReport::new(&section.name);
        let section_dir = Path::new(&section.name);
        let source_dir = self.config.source_dir(section);

        roots.create_dir(section_dir)?;
        copy_assets(&source_dir.join("assets"), &roots.paths(section_dir.join("assets")));

        if !source_dir.exists() {
            fs::create_dir_all(&source_dir).map_err(|source| BuildError::CreateDir {
                path: source_dir.clone(),
                source,
            })?;
            tracing::info!(
                "Created missing content directory {:?}; add markdown files and rebuild",
                source_dir
            );
            return Ok(report);
        }

        let files = discover_markdown_files(&source_dir)?;
        if files.is_empty() {
            tracing::info!("No markdown files found in {:?}", source_dir);
            return Ok(report);
        }
        tracing::info!("Processing {} markdown files from {:?}", files.len(), source_dir);

        let ctx = SectionContext {
            section,
            extractor: MetadataExtractor::for_section(section, self.today),
            stylesheet: load_stylesheet(&self.config, section),
            feed_href: (self.config.feed.enabled && section.in_feed())
                .then(|| format!("/{}", self.config.feed.path.trim_start_matches('/'))),
        };

        let mut manifest = Manifest::new(section.kind);
        for path in &files {
            match self.build_entry(&ctx, path, roots) {
                Ok(Some(rendered)) => {
                    manifest.push(&rendered.metadata);
                    if section.in_feed() {
                        feed.push_entry(&section.name, &rendered.metadata, &rendered.html);
                    }
                    report.pages_written += 1;
                }
                Ok(None) => report.drafts += 1,
                Err(err) => {
                    tracing::error!("Skipping {:?}: {}", path, err);
                    report.skipped.push(SkippedEntry {
                        path: path.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let json = manifest.to_json().map_err(|source| BuildError::Serialize {
            section: section.name.clone(),
            source,
        })?;
        roots.write(section_dir.join("manifest.json"), json.as_bytes())?;
        report.manifest_written = true;
        tracing::info!(
            "✓ Generated: {}/manifest.json ({} entries)",
            section.name,
            manifest.len()
        );

        Ok(report)
    }

    /// Render and write one entry; `Ok(None)` for drafts
    fn build_entry(
        &self,
        ctx: &SectionContext<'_>,
        path: &Path,
        roots: &OutputRoots,
    ) -> Result<Option<RenderedEntry>, EntryError> {
        let entry = read_entry(path)?;
        if entry.frontmatter.draft {
            tracing::debug!("Skipping draft: {:?}", path);
            return Ok(None);
        }

        let metadata = ctx.extractor.extract(&entry);
        let html = self.renderer.render(&entry.body);

        let page = assemble_page(&Page {
            title: &metadata.title,
            slug: &metadata.slug,
            description: Some(&metadata.excerpt),
            content_html: &html,
            stylesheet: &ctx.stylesheet,
            home_href: &self.config.site.home,
            feed_href: ctx.feed_href.as_deref(),
            widgets: &ctx.section.widgets,
        })
        .map_err(|source| EntryError::Render {
            path: path.to_path_buf(),
            source,
        })?;

        let rel = Path::new(&ctx.section.name).join(&metadata.filename);
        roots.write(&rel, page.as_bytes())?;
        tracing::info!("✓ Generated: {}", rel.display());

        Ok(Some(RenderedEntry { metadata, html }))
    }
}
