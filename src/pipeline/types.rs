//! Data model shared by the pipeline stages.

use serde::{Deserialize, Serialize};

/// Provenance tag stamped on every pipeline-generated record.
pub const OFFICIAL_SOURCE: &str = "official";

/// Tag added to every command record.
pub const COMMAND_PIPELINE_TAG: &str = "tldr";

/// Tag added to every role-prompt record.
pub const PROMPT_PIPELINE_TAG: &str = "roleplay";

/// Which family of source an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    RolePrompt,
    CommandReference,
}

/// One unprocessed entry handed over by a source adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub title: String,
    pub body: String,
    pub language: String,
    pub source_kind: SourceKind,
    /// Platform label for command sources. Role prompts classify by content
    /// and ignore it.
    pub platform_hint: Option<String>,
}

impl RawEntry {
    /// Convenience constructor for a role-prompt entry.
    pub fn role_prompt(
        title: impl Into<String>,
        body: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            language: language.into(),
            source_kind: SourceKind::RolePrompt,
            platform_hint: None,
        }
    }

    /// Convenience constructor for a command page; `title` is the command name.
    pub fn command_page(
        command: impl Into<String>,
        document: impl Into<String>,
        language: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            title: command.into(),
            body: document.into(),
            language: language.into(),
            source_kind: SourceKind::CommandReference,
            platform_hint: Some(platform.into()),
        }
    }
}

/// Record type written to packs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Prompt,
    Command,
}

/// The durable output unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub title: String,
    pub content: String,
    pub group: String,
    pub description: String,
    pub tags: Vec<String>,
    pub is_favorite: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub source: String,
}

/// Why an entry or action produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    EmptyTitle,
    EmptyBody,
    EmptyContent,
    /// A list item with no code line before the next list item or EOF.
    UnpairedAction,
    /// A code line that was empty once its backticks were removed.
    EmptyCommand,
    /// A source row or item that could not be decoded.
    MalformedRow,
}

/// Counters for silently dropped items, one per [`DropReason`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropStats {
    pub empty_title: usize,
    pub empty_body: usize,
    pub empty_content: usize,
    pub unpaired_action: usize,
    pub empty_command: usize,
    pub malformed_row: usize,
}

impl DropStats {
    pub const fn record(&mut self, reason: DropReason) {
        match reason {
            DropReason::EmptyTitle => self.empty_title += 1,
            DropReason::EmptyBody => self.empty_body += 1,
            DropReason::EmptyContent => self.empty_content += 1,
            DropReason::UnpairedAction => self.unpaired_action += 1,
            DropReason::EmptyCommand => self.empty_command += 1,
            DropReason::MalformedRow => self.malformed_row += 1,
        }
    }

    pub const fn merge(&mut self, other: &Self) {
        self.empty_title += other.empty_title;
        self.empty_body += other.empty_body;
        self.empty_content += other.empty_content;
        self.unpaired_action += other.unpaired_action;
        self.empty_command += other.empty_command;
        self.malformed_row += other.malformed_row;
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.empty_title
            + self.empty_body
            + self.empty_content
            + self.unpaired_action
            + self.empty_command
            + self.malformed_row
    }
}

/// Result of pushing one entry through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Emitted(CanonicalRecord),
    Dropped(DropReason),
}

impl EntryOutcome {
    #[must_use]
    pub fn into_record(self) -> Option<CanonicalRecord> {
        match self {
            Self::Emitted(record) => Some(record),
            Self::Dropped(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_serializes_with_camel_case_keys() {
        let record = CanonicalRecord {
            id: "tldr-en-linux-ls-0".into(),
            record_type: RecordType::Command,
            title: "ls - List files".into(),
            content: "ls -la".into(),
            group: "Linux Ops".into(),
            description: "ls: List directory contents. (List files)".into(),
            tags: vec!["linux".into(), "ls".into(), "tldr".into(), "en".into()],
            is_favorite: false,
            created_at: 1,
            updated_at: 1,
            source: OFFICIAL_SOURCE.into(),
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "command");
        assert_eq!(json["isFavorite"], false);
        assert_eq!(json["createdAt"], 1);
        assert_eq!(json["group"], "Linux Ops");
        assert!(json.get("record_type").is_none());
    }

    #[test]
    fn drop_stats_accumulate() {
        let mut stats = DropStats::default();
        stats.record(DropReason::EmptyBody);
        stats.record(DropReason::UnpairedAction);
        stats.record(DropReason::UnpairedAction);

        let mut total = DropStats::default();
        total.merge(&stats);
        total.merge(&stats);

        assert_eq!(total.unpaired_action, 4);
        assert_eq!(total.empty_body, 2);
        assert_eq!(total.total(), 6);
    }
}
