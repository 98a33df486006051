//! Per-section JSON manifest consumed by the UI.

use crate::config::SectionKind;
use crate::models::{DerivedMetadata, ManifestEntry};

/// Sorted index of one section's entries
#[derive(Debug, Clone)]
pub struct Manifest {
    kind: SectionKind,
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new(kind: SectionKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, metadata: &DerivedMetadata) {
        self.entries.push(ManifestEntry::from(metadata));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Blog: newest first, ties keep encounter order. Projects: title ascending
    pub fn sort(&mut self) {
        sort_entries(&mut self.entries, self.kind);
    }

    /// Sorted, 2-space indented JSON
    pub fn to_json(&mut self) -> Result<String, serde_json::Error> {
        self.sort();
        serde_json::to_string_pretty(&self.entries)
    }
}

pub fn sort_entries(entries: &mut [ManifestEntry], kind: SectionKind) {
    match kind {
        SectionKind::Blog => entries.sort_by(|a, b| b.date.cmp(&a.date)),
        SectionKind::Projects => entries.sort_by(|a, b| a.title.cmp(&b.title)),
    }
}
