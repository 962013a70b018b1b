//! Cheat-sheet page parsing.
//!
//! Pages follow the tldr layout:
//!
//! ```text
//! # ls
//!
//! > List directory contents.
//! > More information: <https://example.com/ls>.
//!
//! - List files one per line:
//!
//! `ls -1`
//! ```
//!
//! Each `- ` list item sets a pending action; the next single-backtick code
//! line pairs with it and yields one record.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use super::types::{
    CanonicalRecord, DropReason, DropStats, OFFICIAL_SOURCE, RecordType, COMMAND_PIPELINE_TAG,
};

/// HTML tags and markdown links, both removed from description lines.
static DESCRIPTION_NOISE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>|\[[^\]]+\]\([^)]+\)").unwrap());

/// Description lines containing any of these are reference links, not prose.
const REFERENCE_MARKERS: &[&str] = &["more information", "see also", "更多信息", "另请参阅", "参见"];

const ACTION_TERMINATORS: &[char] = &[':', '：', '.', '。'];

/// One action/command pair found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandAction {
    pub action: String,
    pub command: String,
}

/// Parsed content of one page, before records are built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub description: String,
    pub actions: Vec<CommandAction>,
    pub drops: DropStats,
}

/// Identity of the page being extracted.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub command: &'a str,
    pub platform: &'a str,
    pub language: &'a str,
    /// Resolved platform display name, used as the record group.
    pub display_name: &'a str,
}

/// Records built from one page plus the items dropped on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<CanonicalRecord>,
    pub drops: DropStats,
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse a page into its description and action/command pairs.
#[must_use]
pub fn parse_page(document: &str, command: &str) -> ParsedPage {
    let description = page_description(document, command);
    let mut actions = Vec::new();
    let mut drops = DropStats::default();
    let mut pending: Option<String> = None;

    for line in document.lines().map(str::trim) {
        if let Some(item) = line.strip_prefix("- ") {
            if pending.is_some() {
                drops.record(DropReason::UnpairedAction);
            }
            pending = Some(action_text(item)).filter(|action| !action.is_empty());
        } else if let Some(code) = inline_code(line) {
            let Some(action) = pending.take() else {
                continue;
            };
            if code.is_empty() {
                drops.record(DropReason::EmptyCommand);
            } else {
                actions.push(CommandAction {
                    action,
                    command: code.to_string(),
                });
            }
        }
    }

    if pending.is_some() {
        drops.record(DropReason::UnpairedAction);
    }

    ParsedPage {
        description,
        actions,
        drops,
    }
}

/// Joined blockquote prose of a page, or `"<command> command"` when there is
/// none.
#[must_use]
pub fn page_description(document: &str, command: &str) -> String {
    let description = document
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('>'))
        .map(|line| line.trim_start_matches(|c: char| c == '>' || c.is_whitespace()))
        .filter(|line| !is_reference_line(line))
        .map(|line| DESCRIPTION_NOISE_REGEX.replace_all(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .join(" ");

    if description.is_empty() {
        format!("{command} command")
    } else {
        description
    }
}

fn is_reference_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    REFERENCE_MARKERS.iter().any(|marker| lower.contains(marker))
}

fn action_text(item: &str) -> String {
    item.trim_end_matches(|c: char| ACTION_TERMINATORS.contains(&c) || c.is_whitespace())
        .trim()
        .to_string()
}

/// Body of a single-backtick code line. Fences are not code lines.
fn inline_code(line: &str) -> Option<&str> {
    if line.len() < 2 || line.starts_with("```") {
        return None;
    }
    if line.starts_with('`') && line.ends_with('`') {
        Some(line.trim_matches('`').trim())
    } else {
        None
    }
}

// =============================================================================
// Record building
// =============================================================================

/// Parse a page and build one command record per action/command pair.
///
/// Record ids are `tldr-{language}-{platform}-{command}-{index}` where the
/// index counts emitted records, so ids are stable across rebuilds of the same
/// page.
#[must_use]
pub fn extract(document: &str, page: &PageContext<'_>, timestamp: i64) -> Extraction {
    let parsed = parse_page(document, page.command);
    let records = parsed
        .actions
        .iter()
        .enumerate()
        .map(|(index, pair)| command_record(page, &parsed.description, pair, index, timestamp))
        .collect();

    Extraction {
        records,
        drops: parsed.drops,
    }
}

fn command_record(
    page: &PageContext<'_>,
    description: &str,
    pair: &CommandAction,
    index: usize,
    timestamp: i64,
) -> CanonicalRecord {
    CanonicalRecord {
        id: command_record_id(page.language, page.platform, page.command, index),
        record_type: RecordType::Command,
        title: format!("{} - {}", page.command, pair.action),
        content: pair.command.clone(),
        group: page.display_name.to_string(),
        description: format!("{}: {description} ({})", page.command, pair.action),
        tags: command_tags(page),
        is_favorite: false,
        created_at: timestamp,
        updated_at: timestamp,
        source: OFFICIAL_SOURCE.to_string(),
    }
}

#[must_use]
pub fn command_record_id(language: &str, platform: &str, command: &str, index: usize) -> String {
    format!("tldr-{language}-{platform}-{command}-{index}")
}

fn command_tags(page: &PageContext<'_>) -> Vec<String> {
    [page.platform, page.command, COMMAND_PIPELINE_TAG, page.language]
        .into_iter()
        .map(str::to_lowercase)
        .unique()
        .collect()
}
