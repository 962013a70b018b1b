//! Build progress reporting
//!
//! Adapts [`BuildEvent`]s to the output context:
//! - TTY mode: an animated progress bar over the planned groups
//! - Non-TTY mode: one line per event on stderr
//! - JSON mode: JSON progress events on stderr
//! - Quiet mode: no output

use std::io::IsTerminal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::build::BuildEvent;

// ============================================================================
// Progress Mode Detection
// ============================================================================

/// Progress output mode based on terminal capabilities and user preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// TTY mode: animated progress bar
    Tty,
    /// Non-TTY mode: simple line-by-line output to stderr
    NonTty,
    /// JSON progress events to stderr
    Json,
    /// Quiet mode: no progress output
    Quiet,
}

impl ProgressMode {
    /// Detect the appropriate progress mode based on environment
    #[must_use]
    pub fn detect(json: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if json {
            Self::Json
        } else if std::io::stderr().is_terminal() {
            Self::Tty
        } else {
            Self::NonTty
        }
    }

    #[must_use]
    pub const fn has_output(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}

// ============================================================================
// Progress Events (JSON Mode)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
struct ProgressEvent<'a> {
    #[serde(rename = "type")]
    event_type: &'static str,
    event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    current: u64,
    total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    timestamp: String,
}

impl<'a> ProgressEvent<'a> {
    fn new(event: &'static str, id: Option<&'a str>, current: u64, total: u64) -> Self {
        Self {
            event_type: "progress",
            event,
            id,
            current,
            total,
            count: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            eprintln!("{json}");
        }
    }
}

// ============================================================================
// Build Progress
// ============================================================================

/// Observer for a running build. Safe to call from rayon workers.
pub struct BuildProgress {
    mode: ProgressMode,
    bar: Option<ProgressBar>,
    done: AtomicU64,
    total: AtomicU64,
}

impl BuildProgress {
    #[must_use]
    pub fn new(mode: ProgressMode) -> Self {
        let bar = (mode == ProgressMode::Tty).then(|| {
            let pb = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.cyan} {msg:<16} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
            {
                pb.set_style(style.progress_chars("█▓▒░"));
            }
            pb.set_message("planning");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        Self {
            mode,
            bar,
            done: AtomicU64::new(0),
            total: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ProgressMode {
        self.mode
    }

    /// Number of groups that have finished, written or skipped.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.done.load(Ordering::Relaxed)
    }

    pub fn observe(&self, event: &BuildEvent) {
        match event {
            BuildEvent::GroupsPlanned { total } => {
                let total = *total as u64;
                self.total.store(total, Ordering::Relaxed);
                match self.mode {
                    ProgressMode::Tty => {
                        if let Some(pb) = &self.bar {
                            pb.set_length(total);
                            pb.set_message("building");
                        }
                    }
                    ProgressMode::NonTty => eprintln!("[packforge] building {total} groups"),
                    ProgressMode::Json => ProgressEvent::new("planned", None, 0, total).emit(),
                    ProgressMode::Quiet => {}
                }
            }
            BuildEvent::PackWritten { id, count } => {
                let current = self.advance();
                match self.mode {
                    ProgressMode::Tty => {
                        if let Some(pb) = &self.bar {
                            pb.set_message(id.clone());
                            pb.inc(1);
                        }
                    }
                    ProgressMode::NonTty => {
                        eprintln!("[packforge] wrote {id} ({count} records)");
                    }
                    ProgressMode::Json => {
                        let mut progress =
                            ProgressEvent::new("pack_written", Some(id), current, self.planned());
                        progress.count = Some(*count);
                        progress.emit();
                    }
                    ProgressMode::Quiet => {}
                }
            }
            BuildEvent::GroupSkipped { id } => {
                let current = self.advance();
                match self.mode {
                    ProgressMode::Tty => {
                        if let Some(pb) = &self.bar {
                            pb.inc(1);
                        }
                    }
                    ProgressMode::NonTty => eprintln!("[packforge] skipped {id} (no records)"),
                    ProgressMode::Json => {
                        ProgressEvent::new("group_skipped", Some(id), current, self.planned())
                            .emit();
                    }
                    ProgressMode::Quiet => {}
                }
            }
            BuildEvent::SourceFailed { source } => match self.mode {
                ProgressMode::Tty => {
                    if let Some(pb) = &self.bar {
                        pb.println(format!("  skipped {source}"));
                    }
                }
                // NonTty and Json already get the warn! log line on stderr.
                ProgressMode::NonTty | ProgressMode::Json | ProgressMode::Quiet => {}
            },
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.bar {
            pb.finish_and_clear();
        }
    }

    fn advance(&self) -> u64 {
        self.done.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn planned(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}
