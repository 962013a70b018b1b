use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

use crate::error::{ErrorCode, PackError, Result, StructuredError};

/// Envelope for `--json` output.
#[derive(Serialize)]
pub struct JsonResponse<T> {
    pub status: JsonStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonStatus {
    Ok,
    Error {
        /// Error code enum value (e.g., "SOURCE_UNAVAILABLE")
        code: ErrorCode,
        /// Numeric error code (e.g., 101)
        numeric_code: u16,
        message: String,
        /// Actionable suggestion for recovery
        suggestion: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<serde_json::Value>,
        recoverable: bool,
        category: String,
    },
    /// Some sources failed but at least one pack was written.
    Partial { completed: usize, failed: usize },
}

impl From<StructuredError> for JsonStatus {
    fn from(err: StructuredError) -> Self {
        Self::Error {
            code: err.code,
            numeric_code: err.numeric_code,
            message: err.message,
            suggestion: err.suggestion,
            context: err.context,
            recoverable: err.recoverable,
            category: err.category,
        }
    }
}

fn respond<T: Serialize>(status: JsonStatus, data: T, warnings: Vec<String>) -> JsonResponse<T> {
    JsonResponse {
        status,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
        warnings,
    }
}

pub fn json_ok<T: Serialize>(data: T) -> JsonResponse<T> {
    respond(JsonStatus::Ok, data, Vec::new())
}

/// Successful response that still carries per-source failures.
pub fn json_partial<T: Serialize>(
    data: T,
    completed: usize,
    warnings: Vec<String>,
) -> JsonResponse<T> {
    let status = if warnings.is_empty() {
        JsonStatus::Ok
    } else {
        JsonStatus::Partial {
            completed,
            failed: warnings.len(),
        }
    };
    respond(status, data, warnings)
}

/// Structured error response with code, suggestion and context.
pub fn json_error(err: &PackError) -> JsonResponse<serde_json::Value> {
    respond(
        err.to_structured().into(),
        serde_json::Value::Null,
        Vec::new(),
    )
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 14,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.chars().count().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let padded = format!("{key:width$}", width = self.key_width);
        self.lines
            .push(format!("{} {value}", style(padded).dim()));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}
