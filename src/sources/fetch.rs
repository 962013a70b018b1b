//! Source retrieval: local files or a single blocking HTTP GET.

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::error::{PackError, Result};

/// Fetches source text. Remote requests use a fixed timeout and are not
/// retried.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Return the text at `location`: an `http(s)://` URL, or a path resolved
    /// against `root`.
    pub fn fetch(&self, source_id: &str, location: &str, root: &Path) -> Result<String> {
        if is_remote(location) {
            self.fetch_remote(source_id, location)
        } else {
            fetch_local(source_id, &root.join(location))
        }
    }

    fn fetch_remote(&self, source_id: &str, url: &str) -> Result<String> {
        let unavailable = |reason: String| PackError::SourceUnavailable {
            source_id: source_id.to_string(),
            location: url.to_string(),
            reason,
        };

        info!(source = source_id, url, "downloading source");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {status}")));
        }

        let text = response.text().map_err(|e| unavailable(e.to_string()))?;
        debug!(source = source_id, bytes = text.len(), "download complete");
        Ok(text)
    }
}

fn fetch_local(source_id: &str, path: &Path) -> Result<String> {
    debug!(source = source_id, path = %path.display(), "reading local source");
    std::fs::read_to_string(path).map_err(|e| PackError::SourceUnavailable {
        source_id: source_id.to_string(),
        location: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Whether `location` names a remote source.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
