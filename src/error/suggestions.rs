//! Context-aware error suggestions.
//!
//! Complements the static suggestions in the `codes` module with hints that
//! name the failing source, file or config key.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::SourceUnavailable | ErrorCode::NetworkUnreachable => {
            suggest_source_unavailable(code, context)
        }
        ErrorCode::ConfigMissingRequired => suggest_config_missing_required(context),
        ErrorCode::PatternInvalid => suggest_pattern_invalid(context),
        _ => code.suggestion().to_string(),
    }
}

fn suggest_source_unavailable(code: ErrorCode, context: Option<&Value>) -> String {
    let source = context.and_then(|c| c.get("source")).and_then(Value::as_str);
    let location = context.and_then(|c| c.get("location")).and_then(Value::as_str);

    match (source, location) {
        (Some(source), Some(location)) if location.starts_with("http") => format!(
            "Source '{source}' could not be downloaded from {location}.\nDownload it manually and set `location` to the local file"
        ),
        (Some(source), Some(location)) => format!(
            "Source '{source}' could not be read from {location}.\nCheck the path; relative paths are resolved against the project root"
        ),
        _ => code.suggestion().to_string(),
    }
}

fn suggest_config_missing_required(context: Option<&Value>) -> String {
    context
        .and_then(|c| c.get("config_key"))
        .and_then(Value::as_str)
        .map_or_else(
            || ErrorCode::ConfigMissingRequired.suggestion().to_string(),
            |key| format!("Set `{key}` in packforge.toml"),
        )
}

fn suggest_pattern_invalid(context: Option<&Value>) -> String {
    context
        .and_then(|c| c.get("language"))
        .and_then(Value::as_str)
        .map_or_else(
            || ErrorCode::PatternInvalid.suggestion().to_string(),
            |language| {
                format!("The redaction rule for '{language}' does not compile. Fix its `lead` pattern")
            },
        )
}
