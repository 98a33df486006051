//! Writing build artifacts to every output root.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
#[error("Failed to write {path:?}: {source}")]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// The parallel output trees (production output and dev-server root)
#[derive(Debug, Clone)]
pub struct OutputRoots {
    roots: Vec<PathBuf>,
}

impl OutputRoots {
    /// Identical roots are written only once
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut unique: Vec<PathBuf> = Vec::new();
        for root in roots {
            if !unique.contains(&root) {
                unique.push(root);
            }
        }
        Self { roots: unique }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// `rel` joined onto every root
    pub fn paths(&self, rel: impl AsRef<Path>) -> Vec<PathBuf> {
        self.roots.iter().map(|root| root.join(rel.as_ref())).collect()
    }

    /// Create `rel` under every root
    pub fn create_dir(&self, rel: impl AsRef<Path>) -> Result<(), WriteError> {
        for path in self.paths(rel) {
            fs::create_dir_all(&path).map_err(|source| WriteError { path, source })?;
        }
        Ok(())
    }

    /// Write `contents` to `rel` under every root
    ///
    /// Every root is attempted even after a failure; each failure is logged
    /// and the first one is returned.
    pub fn write(&self, rel: impl AsRef<Path>, contents: &[u8]) -> Result<(), WriteError> {
        let mut first_error = None;

        for path in self.paths(rel) {
            if let Err(source) = write_file(&path, contents) {
                tracing::error!("Failed to write {:?}: {}", path, source);
                first_error.get_or_insert(WriteError { path, source });
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn write_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writes_to_every_root() {
        let dir = tempdir().unwrap();
        let roots = OutputRoots::new([dir.path().join("dist"), dir.path().join("public")]);

        roots.write("blog/manifest.json", b"[]").unwrap();

        for root in ["dist", "public"] {
            let written = fs::read_to_string(dir.path().join(root).join("blog/manifest.json"));
            assert_eq!(written.unwrap(), "[]");
        }
    }

    #[test]
    fn test_duplicate_roots_are_collapsed() {
        let roots = OutputRoots::new([PathBuf::from("dist"), PathBuf::from("dist")]);
        assert_eq!(roots.roots().len(), 1);
    }

    #[test]
    fn test_failure_in_one_root_still_writes_the_other() {
        let dir = tempdir().unwrap();
        // A file where a directory is expected makes the first root unwritable
        let blocked = dir.path().join("blocked");
        fs::write(&blocked, "not a dir").unwrap();
        let good = dir.path().join("good");
        let roots = OutputRoots::new([blocked.clone(), good.clone()]);

        let err = roots.write("feed.xml", b"<rss/>").unwrap_err();
        assert_eq!(err.path, blocked.join("feed.xml"));
        assert_eq!(fs::read_to_string(good.join("feed.xml")).unwrap(), "<rss/>");
    }
}
