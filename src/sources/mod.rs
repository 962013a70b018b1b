//! Source adapters: turn fetched bytes and cheat-sheet trees into
//! [`RawEntry`] values.
//!
//! - [`tabular`]: CSV with `act` / `prompt` columns
//! - [`structured`]: JSON array of `{ "act", "prompt" }` objects
//! - [`tree`]: `<root>/<platform>/<command>.md` cheat-sheet directories
//! - [`fetch`]: local path or `http(s)://` retrieval

pub mod fetch;
pub mod structured;
pub mod tabular;
pub mod tree;

use std::path::Path;

use crate::config::{PromptSourceConfig, SourceFormat};
use crate::error::Result;
use crate::pipeline::types::{DropReason, DropStats, RawEntry};

pub use fetch::Fetcher;
pub use tree::{Discovery, PlatformDir, discover_platforms, read_page};

/// Entries decoded from one source plus the rows that could not be decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBatch {
    pub entries: Vec<RawEntry>,
    pub drops: DropStats,
}

impl SourceBatch {
    fn push(&mut self, entry: RawEntry) {
        self.entries.push(entry);
    }

    fn malformed(&mut self) {
        self.drops.record(DropReason::MalformedRow);
    }
}

/// Decode role-prompt source text in the given format.
pub fn decode_prompts(
    source: &PromptSourceConfig,
    format: SourceFormat,
    text: &str,
) -> Result<SourceBatch> {
    match format {
        SourceFormat::Csv => tabular::parse(&source.id, text, &source.language),
        SourceFormat::Json => structured::parse(&source.id, text, &source.language),
    }
}

/// Fetch and decode one configured role-prompt source.
pub fn load_prompt_source(
    fetcher: &Fetcher,
    source: &PromptSourceConfig,
    root: &Path,
) -> Result<SourceBatch> {
    let text = fetcher.fetch(&source.id, &source.location, root)?;
    decode_prompts(source, source.format, &text)
}
