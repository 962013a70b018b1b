//! Build orchestration: every configured source into packs plus a manifest.
//!
//! Role-prompt sources and (language, platform) command groups are processed
//! in parallel with rayon. Each group writes its own pack file; manifest
//! entries, drop counters and failures are collected behind mutexes and
//! ordered at the end so the output does not depend on scheduling.

use std::path::{Path, PathBuf};
use std::time::Instant;

use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{CommandSourceConfig, Config, PromptSourceConfig};
use crate::error::{ErrorCode, PackError, Result};
use crate::packs::{Manifest, ManifestAggregator, Pack, PackKind, PackWriter};
use crate::pipeline::assembler::RecordAssembler;
use crate::pipeline::types::{DropStats, EntryOutcome};
use crate::sources::{self, Fetcher, PlatformDir};

/// What to build and where.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub out_dir: PathBuf,
    pub prompts: bool,
    pub commands: bool,
}

impl BuildOptions {
    /// Build everything into the configured output directory.
    #[must_use]
    pub fn from_config(config: &Config, root: &Path) -> Self {
        Self {
            out_dir: config.output_dir(root),
            prompts: true,
            commands: true,
        }
    }
}

/// Progress notifications emitted while building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    GroupsPlanned { total: usize },
    PackWritten { id: String, count: usize },
    GroupSkipped { id: String },
    SourceFailed { source: String },
}

/// A source, group or document that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: String,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
    pub drops: DropStats,
    pub failures: Vec<SourceFailure>,
    pub duration_ms: u64,
}

/// Run a full build with UUID prompt ids and the current time as the run
/// timestamp.
pub fn run_build(
    config: &Config,
    root: &Path,
    options: &BuildOptions,
    observer: &(dyn Fn(&BuildEvent) + Sync),
) -> Result<BuildReport> {
    let assembler = RecordAssembler::new(
        config.classifier.build(),
        config.redaction.build()?,
        chrono::Utc::now().timestamp_millis(),
    );
    BuildRun::new(config, root, options, assembler, observer)?.run()
}

/// State shared by the parallel workers of one build.
pub struct BuildRun<'a> {
    config: &'a Config,
    root: &'a Path,
    options: &'a BuildOptions,
    assembler: RecordAssembler,
    fetcher: Fetcher,
    writer: PackWriter,
    aggregator: ManifestAggregator,
    drops: Mutex<DropStats>,
    failures: Mutex<Vec<SourceFailure>>,
    observer: &'a (dyn Fn(&BuildEvent) + Sync),
}

impl<'a> BuildRun<'a> {
    pub fn new(
        config: &'a Config,
        root: &'a Path,
        options: &'a BuildOptions,
        assembler: RecordAssembler,
        observer: &'a (dyn Fn(&BuildEvent) + Sync),
    ) -> Result<Self> {
        Ok(Self {
            config,
            root,
            options,
            assembler,
            fetcher: Fetcher::new(&config.fetch)?,
            writer: PackWriter::new(&options.out_dir, config.output.pretty),
            aggregator: ManifestAggregator::new(),
            drops: Mutex::new(DropStats::default()),
            failures: Mutex::new(Vec::new()),
            observer,
        })
    }

    pub fn run(self) -> Result<BuildReport> {
        let started = Instant::now();
        let config = self.config;

        let prompt_sources: Vec<&PromptSourceConfig> = if self.options.prompts {
            config.active_prompt_sources().collect()
        } else {
            Vec::new()
        };
        let command_groups = if self.options.commands {
            self.plan_command_groups()
        } else {
            Vec::new()
        };
        (self.observer)(&BuildEvent::GroupsPlanned {
            total: prompt_sources.len() + command_groups.len(),
        });
        info!(
            prompt_sources = prompt_sources.len(),
            command_groups = command_groups.len(),
            out_dir = %self.options.out_dir.display(),
            "starting build"
        );

        prompt_sources
            .par_iter()
            .for_each(|source| self.build_prompt_pack(source));
        command_groups
            .par_iter()
            .for_each(|(source, dir)| self.build_command_pack(source, dir));

        self.finish(started)
    }

    fn plan_command_groups(&self) -> Vec<(&'a CommandSourceConfig, PlatformDir)> {
        let config = self.config;
        let mut groups = Vec::new();
        for source in config.active_command_sources() {
            let source_id = command_source_id(source);
            let root = self.root.join(&source.root);
            match sources::discover_platforms(&source_id, &root) {
                Ok(discovery) => {
                    for (location, err) in &discovery.failures {
                        self.fail(location, err);
                    }
                    groups.extend(discovery.platforms.into_iter().map(|dir| (source, dir)));
                }
                Err(err) => self.fail(&source_id, &err),
            }
        }
        groups
    }

    fn build_prompt_pack(&self, source: &PromptSourceConfig) {
        let batch = match sources::load_prompt_source(&self.fetcher, source, self.root) {
            Ok(batch) => batch,
            Err(err) => {
                self.fail(&source.id, &err);
                return;
            }
        };

        let mut drops = batch.drops;
        let records = batch
            .entries
            .iter()
            .filter_map(|entry| match self.assembler.assemble_prompt(entry) {
                EntryOutcome::Emitted(record) => Some(record),
                EntryOutcome::Dropped(reason) => {
                    drops.record(reason);
                    None
                }
            })
            .collect();
        debug!(source = %source.id, dropped = drops.total(), "assembled prompt source");
        self.drops.lock().merge(&drops);

        self.publish(&Pack {
            kind: PackKind::Prompt,
            language: source.language.clone(),
            platform: source.platform.clone(),
            name: source.name.clone(),
            records,
        });
    }

    fn build_command_pack(&self, source: &CommandSourceConfig, dir: &PlatformDir) {
        let display_name = source.display_name(&dir.platform);
        let mut drops = DropStats::default();
        let mut records = Vec::new();

        for path in &dir.pages {
            let entry = match sources::read_page(path, &source.language, &dir.platform) {
                Ok(entry) => entry,
                Err(err) => {
                    self.fail(&path.display().to_string(), &err);
                    continue;
                }
            };
            let extraction = self.assembler.assemble_commands(&entry, &display_name);
            drops.merge(&extraction.drops);
            records.extend(extraction.records);
        }
        self.drops.lock().merge(&drops);

        self.publish(&Pack {
            kind: PackKind::Command,
            language: source.language.clone(),
            platform: dir.platform.clone(),
            name: format!("{display_name} ({})", source.language.to_uppercase()),
            records,
        });
    }

    /// Write one pack. A pack that fails validation or cannot be written is
    /// recorded as a failure of its group; the rest of the build carries on.
    fn publish(&self, pack: &Pack) {
        match self.writer.write_pack(pack) {
            Ok(Some(written)) => {
                (self.observer)(&BuildEvent::PackWritten {
                    id: written.entry.id.clone(),
                    count: written.entry.count,
                });
                self.aggregator.push(written.entry);
            }
            Ok(None) => {
                debug!(pack = %pack.id(), "group produced no records, skipped");
                (self.observer)(&BuildEvent::GroupSkipped { id: pack.id() });
            }
            Err(err) => self.fail(&pack.id(), &err),
        }
    }

    fn fail(&self, source: &str, err: &PackError) {
        warn!(source, code = %err.code(), error = %err, "skipping source");
        (self.observer)(&BuildEvent::SourceFailed {
            source: source.to_string(),
        });
        self.failures.lock().push(SourceFailure {
            source: source.to_string(),
            code: err.code(),
            message: err.to_string(),
        });
    }

    fn finish(self, started: Instant) -> Result<BuildReport> {
        let mut failures = self.failures.into_inner();
        failures.sort_by(|a, b| a.source.cmp(&b.source));

        let manifest = self
            .aggregator
            .finish(self.assembler.timestamp(), &self.config.output.manifest_version);
        if manifest.packages.is_empty() {
            return Err(PackError::NothingBuilt(format!(
                "no source produced any records ({} failed)",
                failures.len()
            )));
        }

        let manifest_path = self.writer.write_manifest(&manifest)?;
        let drops = self.drops.into_inner();
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            packs = manifest.packages.len(),
            records = manifest.total_records(),
            dropped = drops.total(),
            failed = failures.len(),
            duration_ms,
            "build complete"
        );

        Ok(BuildReport {
            manifest_path,
            manifest,
            drops,
            failures,
            duration_ms,
        })
    }
}

fn command_source_id(source: &CommandSourceConfig) -> String {
    format!("commands.{}", source.language)
}
