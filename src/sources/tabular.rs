//! CSV role-prompt sources.

use serde::Deserialize;
use tracing::debug;

use super::SourceBatch;
use crate::error::{PackError, Result};
use crate::pipeline::types::RawEntry;

#[derive(Debug, Deserialize)]
struct PromptRow {
    #[serde(default)]
    act: String,
    #[serde(default)]
    prompt: String,
}

/// Parse CSV text with a header row containing `act` and `prompt`. Other
/// columns are ignored; undecodable rows are counted and skipped.
pub fn parse(source_id: &str, text: &str, language: &str) -> Result<SourceBatch> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    for required in ["act", "prompt"] {
        if !headers.iter().any(|header| header == required) {
            return Err(PackError::SourceMalformed {
                source_id: source_id.to_string(),
                reason: format!("missing '{required}' column"),
            });
        }
    }

    let mut batch = SourceBatch::default();
    for (line, row) in reader.deserialize::<PromptRow>().enumerate() {
        match row {
            Ok(row) => batch.push(RawEntry::role_prompt(row.act.trim(), row.prompt, language)),
            Err(err) => {
                debug!(source = source_id, row = line + 1, error = %err, "skipping malformed row");
                batch.malformed();
            }
        }
    }
    Ok(batch)
}
