//! Manifest model and the thread-safe aggregator that collects entries while
//! packs are written in parallel.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{Pack, PackKind};
use crate::utils::format::size_kb;

/// One published pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: String,
    pub language: String,
    pub platform: String,
    pub name: String,
    pub description: String,
    pub count: usize,
    pub size_kb: f64,
    pub url: String,
    pub category: PackKind,
}

impl ManifestEntry {
    /// Describe `pack`, serialized to `bytes` bytes.
    #[must_use]
    pub fn for_pack(pack: &Pack, bytes: u64) -> Self {
        Self {
            id: pack.id(),
            language: pack.language.clone(),
            platform: pack.platform.clone(),
            name: pack.name.clone(),
            description: pack.description(),
            count: pack.len(),
            size_kb: size_kb(bytes),
            url: pack.relative_path(),
            category: pack.kind,
        }
    }
}

/// The aggregate index written as `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Build time in epoch milliseconds.
    pub updated_at: i64,
    pub version: String,
    pub packages: Vec<ManifestEntry>,
}

impl Manifest {
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.packages.iter().map(|entry| entry.count).sum()
    }
}

/// Collects manifest entries from concurrent pack writers.
#[derive(Debug, Default)]
pub struct ManifestAggregator {
    entries: Mutex<Vec<ManifestEntry>>,
}

impl ManifestAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: ManifestEntry) {
        self.entries.lock().push(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Build the manifest. Packages are sorted by id, so the result does not
    /// depend on the order in which groups finished.
    #[must_use]
    pub fn finish(self, updated_at: i64, version: impl Into<String>) -> Manifest {
        let mut packages = self.entries.into_inner();
        packages.sort_by(|a, b| a.id.cmp(&b.id));
        Manifest {
            updated_at,
            version: version.into(),
            packages,
        }
    }
}
