//! Build command implementation.

use anyhow::{Context, Result};
use folio_core::{BuildReport, Config, SiteBuilder};
use std::path::Path;

/// Flags of `folio build`
#[derive(Debug, Default)]
pub struct BuildOptions {
    /// Overrides `site.url` (also read from `SITE_URL`)
    pub site_url: Option<String>,
    pub sections: Vec<String>,
    pub strict: bool,
}

/// Load the config and build the site
pub fn build_site(config_path: &Path, options: BuildOptions) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let mut config = Config::load(config_path).context("Failed to load configuration")?;

    // Relative paths follow the config file even when it does not exist
    if !config_path.exists() {
        let root = config_path.parent().unwrap_or_else(|| Path::new(""));
        config = config.with_root(root);
    }
    apply_options(&mut config, &options)?;

    let report = SiteBuilder::new(config)
        .only_sections(options.sections)
        .build()
        .context("Failed to build site")?;

    log_summary(&report);
    Ok(())
}

fn apply_options(config: &mut Config, options: &BuildOptions) -> Result<()> {
    if let Some(url) = options.site_url.as_deref().map(str::trim) {
        if !url.is_empty() {
            config.site.url = url.to_string();
        }
    }
    if options.strict {
        config.build.strict = true;
    }
    config.validate().context("Invalid configuration")?;
    Ok(())
}

fn log_summary(report: &BuildReport) {
    for section in &report.sections {
        tracing::info!(
            "{}: {} pages, {} drafts, {} skipped",
            section.name,
            section.pages_written,
            section.drafts,
            section.skipped.len()
        );
    }
    for skipped in report.skipped() {
        tracing::warn!("Skipped {:?}: {}", skipped.path, skipped.reason);
    }
    if report.feed_written {
        tracing::info!("Feed: {} items", report.feed_items);
    }
}
