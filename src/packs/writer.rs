//! Pack and manifest persistence.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use super::{Manifest, ManifestEntry, Pack};
use crate::error::{PackError, Result};
use crate::utils::fs::write_atomic;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Result of writing one pack.
#[derive(Debug, Clone)]
pub struct WrittenPack {
    pub path: PathBuf,
    pub bytes: u64,
    pub entry: ManifestEntry,
}

/// Writes packs under `<out_dir>/packs/<language>/<platform>.json` and the
/// manifest at `<out_dir>/manifest.json`.
#[derive(Debug, Clone)]
pub struct PackWriter {
    out_dir: PathBuf,
    pretty: bool,
}

impl PackWriter {
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            pretty,
        }
    }

    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Validate and persist a non-empty pack, returning its manifest entry.
    /// Empty packs are never written.
    pub fn write_pack(&self, pack: &Pack) -> Result<Option<WrittenPack>> {
        if pack.is_empty() {
            return Ok(None);
        }
        pack.validate()?;

        let path = self.out_dir.join(pack.relative_path());
        let bytes = self.serialize(&pack.records)?;
        write_atomic(&path, &bytes)?;

        let size = bytes.len() as u64;
        info!(pack = %pack.id(), records = pack.len(), bytes = size, "wrote pack");
        Ok(Some(WrittenPack {
            entry: ManifestEntry::for_pack(pack, size),
            path,
            bytes: size,
        }))
    }

    pub fn write_manifest(&self, manifest: &Manifest) -> Result<PathBuf> {
        let path = self.out_dir.join(MANIFEST_FILE);
        let bytes = self.serialize(manifest)?;
        write_atomic(&path, &bytes)?;
        info!(packages = manifest.packages.len(), path = %path.display(), "wrote manifest");
        Ok(path)
    }

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        bytes.map_err(PackError::from)
    }
}
