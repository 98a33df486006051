//! Copying a section's `assets/` directory into the output roots.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively copy `src` into every destination, preserving relative paths
///
/// A missing `src` is skipped. Other I/O failures are logged and the copy
/// carries on with the next file. Returns the number of files copied.
pub fn copy_assets(src: &Path, dests: &[PathBuf]) -> usize {
    if !src.is_dir() {
        tracing::debug!("No assets at {:?}; skipping", src);
        return 0;
    }

    let mut copied = 0;
    for dest in dests {
        copied += copy_dir(src, dest);
    }
    if copied > 0 {
        tracing::info!("✓ Copied {} asset files from {:?}", copied, src);
    }
    copied
}

fn copy_dir(src: &Path, dest: &Path) -> usize {
    let mut copied = 0;

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Failed to read asset entry under {:?}: {}", src, err);
                continue;
            }
        };

        let relative = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(relative);

        let result = if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
        } else {
            target
                .parent()
                .map_or(Ok(()), fs::create_dir_all)
                .and_then(|_| fs::copy(entry.path(), &target).map(|_| ()))
        };

        match result {
            Ok(()) if entry.file_type().is_file() => copied += 1,
            Ok(()) => {}
            Err(err) => {
                tracing::warn!("Failed to copy {:?} to {:?}: {}", entry.path(), target, err)
            }
        }
    }

    copied
}
