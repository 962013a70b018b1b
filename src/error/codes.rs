//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Source errors
//! - 2xx: Pipeline errors
//! - 3xx: Config errors
//! - 5xx: Network errors
//! - 6xx: Storage errors
//! - 8xx: Validation errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for `--json` output.
///
/// Each variant maps to a numeric code (e.g., `SourceUnavailable` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Source errors (1xx)
    // ========================================
    /// E101: A prompt source or cheat-sheet root could not be read
    SourceUnavailable,
    /// E102: Tabular or structured source data is malformed
    SourceMalformed,
    /// E103: A cheat-sheet document could not be read
    DocumentUnreadable,

    // ========================================
    // Pipeline errors (2xx)
    // ========================================
    /// E201: A redaction rule pattern failed to compile
    PatternInvalid,
    /// E202: The build produced no packs at all
    NothingBuilt,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file has invalid syntax or values
    ConfigInvalid,
    /// E302: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Network errors (5xx)
    // ========================================
    /// E501: Remote source could not be fetched
    NetworkUnreachable,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: Failed to write a pack or the manifest
    StorageWriteError,
    /// E602: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Validation errors (8xx)
    // ========================================
    /// E801: Pack or manifest invariants were violated
    ValidationFailed,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Generic not found (catch-all)
    NotFound,
    /// E902: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `SourceUnavailable` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::SourceUnavailable => 101,
            Self::SourceMalformed => 102,
            Self::DocumentUnreadable => 103,

            Self::PatternInvalid => 201,
            Self::NothingBuilt => 202,

            Self::ConfigInvalid => 301,
            Self::ConfigMissingRequired => 302,

            Self::NetworkUnreachable => 501,

            Self::StorageWriteError => 601,
            Self::SerializationError => 602,

            Self::ValidationFailed => 801,

            Self::NotFound => 901,
            Self::IoError => 902,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::SourceUnavailable => "Check the source location in packforge.toml. Local paths are resolved against the project root",
            Self::SourceMalformed => "The source must be a CSV with `act`,`prompt` columns or a JSON array of {act, prompt} objects",
            Self::DocumentUnreadable => "Check that the cheat-sheet page is valid UTF-8 and readable",
            Self::PatternInvalid => "Fix the `lead` regex of the redaction rule. Run `packforge config` to see the effective rules",
            Self::NothingBuilt => "No source produced any record. Run with -v to see which sources were skipped",
            Self::ConfigInvalid => "Run `packforge config` to see current values. Check TOML syntax in config file",
            Self::ConfigMissingRequired => "Set the required value in packforge.toml or via the matching PACKFORGE_* variable",
            Self::NetworkUnreachable => "Check your network connection, or point the source at a local copy",
            Self::StorageWriteError => "Check disk space and write permissions on the output directory",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::ValidationFailed => "A pack violated an output invariant. Re-run the build; report the failing pack if it persists",
            Self::NotFound => "The requested resource was not found. Check the path or identifier",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SerializationError | Self::ValidationFailed)
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "source",
            2 => "pipeline",
            3 => "config",
            5 => "network",
            6 => "storage",
            8 => "validation",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::SourceUnavailable,
            Self::SourceMalformed,
            Self::DocumentUnreadable,
            Self::PatternInvalid,
            Self::NothingBuilt,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::NetworkUnreachable,
            Self::StorageWriteError,
            Self::SerializationError,
            Self::ValidationFailed,
            Self::NotFound,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
