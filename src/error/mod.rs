//! Error handling for packforge.
//!
//! This module provides:
//! - [`PackError`]: The main error enum for all packforge operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context

mod codes;
mod suggestions;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::suggest_for_error;

/// Main error type for packforge operations.
#[derive(Error, Debug)]
pub enum PackError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source '{source_id}' unavailable at {location}: {reason}")]
    SourceUnavailable {
        source_id: String,
        location: String,
        reason: String,
    },

    #[error("Malformed source '{source_id}': {reason}")]
    SourceMalformed { source_id: String, reason: String },

    #[error("Cannot read document {path}: {reason}")]
    Document { path: String, reason: String },

    #[error("Invalid redaction pattern for '{language}': {reason}")]
    InvalidPattern { language: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Write failed for {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Nothing built: {0}")]
    NothingBuilt(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl PackError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::Csv(_) | Self::SourceMalformed { .. } => ErrorCode::SourceMalformed,
            Self::Http(_) => ErrorCode::NetworkUnreachable,
            Self::SourceUnavailable { .. } => ErrorCode::SourceUnavailable,
            Self::Document { .. } => ErrorCode::DocumentUnreadable,
            Self::InvalidPattern { .. } => ErrorCode::PatternInvalid,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::Write { .. } => ErrorCode::StorageWriteError,
            Self::ValidationFailed(_) => ErrorCode::ValidationFailed,
            Self::NothingBuilt(_) => ErrorCode::NothingBuilt,
            Self::NotFound(_) => ErrorCode::NotFound,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::SourceUnavailable {
                source_id,
                location,
                ..
            } => Some(serde_json::json!({ "source": source_id, "location": location })),
            Self::SourceMalformed { source_id, reason } => {
                Some(serde_json::json!({ "source": source_id, "reason": reason }))
            }
            Self::Document { path, .. } | Self::Write { path, .. } => {
                Some(serde_json::json!({ "path": path }))
            }
            Self::InvalidPattern { language, .. } => {
                Some(serde_json::json!({ "language": language }))
            }
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_pack_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// Emitted on stdout when the CLI runs with `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "SOURCE_UNAVAILABLE")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "source", "config", "network")
    pub category: String,
}

impl StructuredError {
    /// Create a structured error from a [`PackError`].
    #[must_use]
    pub fn from_pack_error(err: &PackError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<&PackError> for StructuredError {
    fn from(err: &PackError) -> Self {
        Self::from_pack_error(err)
    }
}

/// Result type alias using PackError.
pub type Result<T> = std::result::Result<T, PackError>;
