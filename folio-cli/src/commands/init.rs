//! Init command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = include_str!("../../../folio.yml.example");

/// Initialize a new folio project
pub fn init_project(path: Option<&Path>) -> Result<()> {
    let root = path.unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(root).with_context(|| format!("Failed to create {:?}", root))?;

    write_config(root)?;
    scaffold_content(root)?;

    println!("✓ folio initialized in {:?}", root);
    println!("  - Edit folio.yml to customize site metadata");
    println!("  - Write posts in thoughts/ and project writeups in projects/");
    println!("  - Run `folio build` to generate dist/ and public/");
    Ok(())
}

fn write_config(root: &Path) -> Result<()> {
    let config_path = root.join("folio.yml");
    if config_path.exists() {
        println!("folio.yml already exists at {:?}", config_path);
        return Ok(());
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    println!("Created {:?}", config_path);
    Ok(())
}

fn scaffold_content(root: &Path) -> Result<()> {
    let thoughts = root.join("thoughts");
    let projects = root.join("projects");
    let assets = thoughts.join("assets");

    for dir in [&thoughts, &assets, &projects] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let today = Local::now().date_naive();
    let post = thoughts.join(format!("{}-hello-world.md", today.format("%Y%m%d")));
    write_if_missing(&post, SAMPLE_POST)?;
    write_if_missing(&projects.join("folio.md"), SAMPLE_PROJECT)?;

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Created {:?}", path);
    Ok(())
}

const SAMPLE_POST: &str = r#"# Hello World

This is the first post. The date and slug come from the file name.

Build the site with:

```bash
folio build
```

Images placed in `thoughts/assets/` can be referenced as `assets/name.png`.
"#;

const SAMPLE_PROJECT: &str = r#"---
title: folio
tldr: The static build pipeline behind this site.
---

# folio

Turns markdown into standalone pages, JSON manifests, and an RSS feed.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_scaffolds_project() {
        let dir = tempdir().unwrap();
        init_project(Some(dir.path())).unwrap();

        assert!(dir.path().join("folio.yml").exists());
        assert!(dir.path().join("projects/folio.md").exists());
        assert!(dir.path().join("thoughts/assets").is_dir());
        let posts = fs::read_dir(dir.path().join("thoughts"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
            .count();
        assert_eq!(posts, 1);
    }

    #[test]
    fn test_init_keeps_existing_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("folio.yml"), "site:\n  title: Mine\n").unwrap();
        init_project(Some(dir.path())).unwrap();

        let config = fs::read_to_string(dir.path().join("folio.yml")).unwrap();
        assert_eq!(config, "site:\n  title: Mine\n");
    }

    #[test]
    fn test_default_config_parses() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("folio.yml");
        fs::write(&path, DEFAULT_CONFIG).unwrap();

        let config = folio_core::Config::from_file(&path).unwrap();
        assert_eq!(config.sections.len(), 2);
        assert_eq!(config.site.url, folio_core::config::DEFAULT_SITE_URL);
    }
}
