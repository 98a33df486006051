//! Markdown source discovery and reading.

use crate::builder::EntryError;
use crate::models::ContentEntry;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List the `.md` files directly inside `dir`, sorted by file name
///
/// Subdirectories (including `assets/`) are not descended.
pub fn discover_markdown_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().and_then(|s| s.to_str()) == Some("md")
        {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Read one markdown file; invalid UTF-8 is a decode error
pub fn read_entry(path: &Path) -> Result<ContentEntry, EntryError> {
    let bytes = fs::read(path).map_err(|source| EntryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw_text = String::from_utf8(bytes).map_err(|source| EntryError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(ContentEntry::new(path.to_path_buf(), raw_text))
}
