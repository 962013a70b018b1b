//! Packs: per-(language, platform) record collections and the manifest that
//! indexes them.

pub mod manifest;
pub mod writer;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};
use crate::pipeline::types::CanonicalRecord;

pub use manifest::{Manifest, ManifestAggregator, ManifestEntry};
pub use writer::{PackWriter, WrittenPack};

/// What a pack contains; published as the manifest `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackKind {
    Prompt,
    Command,
}

/// Ordered records sharing one language and platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pack {
    pub kind: PackKind,
    pub language: String,
    pub platform: String,
    /// Display name published in the manifest.
    pub name: String,
    pub records: Vec<CanonicalRecord>,
}

impl Pack {
    /// `{language}-{platform}`.
    #[must_use]
    pub fn id(&self) -> String {
        format!("{}-{}", self.language, self.platform)
    }

    /// Location relative to the output directory.
    #[must_use]
    pub fn relative_path(&self) -> String {
        format!("packs/{}/{}.json", self.language, self.platform)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Human-readable summary containing the record count.
    #[must_use]
    pub fn description(&self) -> String {
        match self.kind {
            PackKind::Prompt => format!("Collection of {} role-play prompts.", self.len()),
            PackKind::Command => format!(
                "Contains {} {} commands for {}.",
                self.len(),
                self.language,
                self.platform
            ),
        }
    }

    /// Check pack-level invariants: unique ids and non-empty content.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if !seen.insert(record.id.as_str()) {
                return Err(PackError::ValidationFailed(format!(
                    "duplicate record id '{}' in pack {}",
                    record.id,
                    self.id()
                )));
            }
            if record.content.trim().is_empty() {
                return Err(PackError::ValidationFailed(format!(
                    "record '{}' in pack {} has empty content",
                    record.id,
                    self.id()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::{OFFICIAL_SOURCE, RecordType};

    fn record(id: &str, content: &str) -> CanonicalRecord {
        CanonicalRecord {
            id: id.to_string(),
            record_type: RecordType::Command,
            title: "t".into(),
            content: content.into(),
            group: "g".into(),
            description: "d".into(),
            tags: vec!["en".into()],
            is_favorite: false,
            created_at: 0,
            updated_at: 0,
            source: OFFICIAL_SOURCE.into(),
        }
    }

    fn pack(kind: PackKind, records: Vec<CanonicalRecord>) -> Pack {
        Pack {
            kind,
            language: "zh".into(),
            platform: "linux".into(),
            name: "Linux 运维 (ZH)".into(),
            records,
        }
    }

    #[test]
    fn identity_and_location() {
        let pack = pack(PackKind::Command, vec![record("a", "x")]);
        assert_eq!(pack.id(), "zh-linux");
        assert_eq!(pack.relative_path(), "packs/zh/linux.json");
        assert_eq!(pack.description(), "Contains 1 zh commands for linux.");
    }

    #[test]
    fn prompt_description() {
        let pack = pack(PackKind::Prompt, vec![record("a", "x"), record("b", "y")]);
        assert_eq!(pack.description(), "Collection of 2 role-play prompts.");
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let pack = pack(PackKind::Command, vec![record("a", "x"), record("a", "y")]);
        let err = pack.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate record id 'a'"));
    }

    #[test]
    fn validate_rejects_empty_content() {
        let pack = pack(PackKind::Prompt, vec![record("a", "  ")]);
        assert!(pack.validate().is_err());
        assert!(pack_ok().validate().is_ok());
    }

    fn pack_ok() -> Pack {
        pack(PackKind::Prompt, vec![record("a", "x"), record("b", "x")])
    }
}
