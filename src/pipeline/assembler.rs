//! Record assembly: composes the text stages and stamps identity.

use std::sync::atomic::{AtomicU64, Ordering};

use itertools::Itertools;
use uuid::Uuid;

use super::classifier::CategoryClassifier;
use super::cleaner;
use super::commands::{self, Extraction, PageContext};
use super::placeholders;
use super::redactor::ExampleRedactor;
use super::types::{
    CanonicalRecord, DropReason, EntryOutcome, OFFICIAL_SOURCE, PROMPT_PIPELINE_TAG, RawEntry,
    RecordType, SourceKind,
};

/// Supplies ids for role-prompt records.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random UUID v4 ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<n>` ids, counting from zero.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(0),
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

/// Runs raw entries through clean → normalize → redact → classify and builds
/// canonical records. One assembler serves one build run; every record it
/// produces carries the same timestamp.
pub struct RecordAssembler {
    classifier: CategoryClassifier,
    redactor: ExampleRedactor,
    ids: Box<dyn IdSource>,
    timestamp: i64,
}

impl std::fmt::Debug for RecordAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordAssembler")
            .field("classifier", &self.classifier)
            .field("redactor", &self.redactor)
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self::new(
            CategoryClassifier::default(),
            ExampleRedactor::default(),
            chrono::Utc::now().timestamp_millis(),
        )
    }
}

impl RecordAssembler {
    #[must_use]
    pub fn new(classifier: CategoryClassifier, redactor: ExampleRedactor, timestamp: i64) -> Self {
        Self {
            classifier,
            redactor,
            ids: Box::new(UuidIds),
            timestamp,
        }
    }

    #[must_use]
    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    #[must_use]
    pub const fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    /// Turn one role-prompt entry into a record, or say why it was dropped.
    #[must_use]
    pub fn assemble_prompt(&self, entry: &RawEntry) -> EntryOutcome {
        let title = entry.title.trim();
        if title.is_empty() {
            return EntryOutcome::Dropped(DropReason::EmptyTitle);
        }
        if entry.body.trim().is_empty() {
            return EntryOutcome::Dropped(DropReason::EmptyBody);
        }

        let content = prompt_content(&self.redactor, &entry.body, &entry.language);
        if content.is_empty() {
            return EntryOutcome::Dropped(DropReason::EmptyContent);
        }

        let group = self.classifier.classify(title, &content);
        let tags = [entry.language.as_str(), PROMPT_PIPELINE_TAG, group.as_str()]
            .into_iter()
            .map(str::to_lowercase)
            .unique()
            .collect();

        EntryOutcome::Emitted(CanonicalRecord {
            id: self.ids.next_id(),
            record_type: RecordType::Prompt,
            title: title.to_string(),
            content,
            description: format!("{title} - AI Assistant Role"),
            group,
            tags,
            is_favorite: false,
            created_at: self.timestamp,
            updated_at: self.timestamp,
            source: OFFICIAL_SOURCE.to_string(),
        })
    }

    /// Extract command records from one cheat-sheet page entry.
    ///
    /// `display_name` is the resolved platform name used as the group. Entries
    /// that are not command pages yield an empty extraction.
    #[must_use]
    pub fn assemble_commands(&self, entry: &RawEntry, display_name: &str) -> Extraction {
        let (SourceKind::CommandReference, Some(platform)) =
            (entry.source_kind, entry.platform_hint.as_deref())
        else {
            return Extraction::default();
        };

        let page = PageContext {
            command: entry.title.trim(),
            platform,
            language: &entry.language,
            display_name,
        };
        commands::extract(&entry.body, &page, self.timestamp)
    }
}

/// Cleaned, normalized and redacted prompt body. Empty when nothing survives
/// cleaning.
#[must_use]
pub fn prompt_content(redactor: &ExampleRedactor, body: &str, language: &str) -> String {
    let cleaned = cleaner::clean(body);
    if cleaned.is_empty() {
        return cleaned;
    }
    let normalized = placeholders::normalize(&cleaned);
    redactor.redact(&normalized, language).trim().to_string()
}
