//! JSON role-prompt sources.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::SourceBatch;
use crate::error::{PackError, Result};
use crate::pipeline::types::RawEntry;

#[derive(Debug, Deserialize)]
struct PromptItem {
    #[serde(default)]
    act: String,
    #[serde(default)]
    prompt: String,
}

/// Parse a JSON array of `{ "act": ..., "prompt": ... }` objects. A document
/// that is not an array is malformed; items that are not such objects are
/// counted and skipped.
pub fn parse(source_id: &str, text: &str, language: &str) -> Result<SourceBatch> {
    let document: Value = serde_json::from_str(text).map_err(|err| PackError::SourceMalformed {
        source_id: source_id.to_string(),
        reason: format!("invalid JSON: {err}"),
    })?;
    let Value::Array(items) = document else {
        return Err(PackError::SourceMalformed {
            source_id: source_id.to_string(),
            reason: "expected a JSON array of prompt objects".to_string(),
        });
    };

    let mut batch = SourceBatch::default();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<PromptItem>(item) {
            Ok(item) => batch.push(RawEntry::role_prompt(item.act.trim(), item.prompt, language)),
            Err(err) => {
                debug!(source = source_id, index, error = %err, "skipping malformed item");
                batch.malformed();
            }
        }
    }
    Ok(batch)
}
