use std::collections::HashSet;
use std::path::{Path, PathBuf};

use packforge::build::{BuildEvent, BuildOptions, BuildReport, BuildRun};
use packforge::config::{Config, PromptSourceConfig, SourceFormat};
use packforge::packs::Manifest;
use packforge::pipeline::assembler::{RecordAssembler, SequentialIds};
use packforge::pipeline::types::CanonicalRecord;
use packforge::test_utils::fixtures::{BuildFixture, PROMPT_CSV, PROMPT_JSON};

/// Fixed run timestamp so records compare across runs.
pub const RUN_TIMESTAMP: i64 = 1_700_000_000_000;

/// A project tree plus the config that points at it.
pub struct Project {
    pub fixture: BuildFixture,
    pub config: Config,
}

impl Project {
    /// Local English CSV and Chinese JSON prompt sources, default command
    /// roots (`tldr/pages`, `tldr/pages.zh`) under the fixture root.
    pub fn new() -> Self {
        let fixture = BuildFixture::new();
        let mut config = Config::default();
        config.prompts = vec![
            prompt_source("en_local", PROMPT_CSV, SourceFormat::Csv, "en", "Local Prompts"),
            prompt_source("zh_local", PROMPT_JSON, SourceFormat::Json, "zh", "本地提示词"),
        ];
        Self { fixture, config }
    }

    pub fn root(&self) -> &Path {
        self.fixture.root()
    }

    pub fn build(&self) -> packforge::Result<BuildReport> {
        self.build_observed(&|_| {})
    }

    pub fn build_observed(
        &self,
        observer: &(dyn Fn(&BuildEvent) + Sync),
    ) -> packforge::Result<BuildReport> {
        let options = BuildOptions::from_config(&self.config, self.root());
        let assembler = RecordAssembler::new(
            self.config.classifier.build(),
            self.config.redaction.build()?,
            RUN_TIMESTAMP,
        )
        .with_ids(SequentialIds::new("prompt"));
        BuildRun::new(&self.config, self.root(), &options, assembler, observer)?.run()
    }

    pub fn read_manifest(&self) -> Manifest {
        let raw = std::fs::read_to_string(self.root().join("dist/manifest.json"))
            .expect("manifest should exist");
        serde_json::from_str(&raw).expect("manifest should parse")
    }

    pub fn read_pack(&self, url: &str) -> Vec<CanonicalRecord> {
        let raw = std::fs::read_to_string(self.root().join("dist").join(url))
            .unwrap_or_else(|e| panic!("pack {url} should exist: {e}"));
        serde_json::from_str(&raw).expect("pack should parse")
    }

    pub fn pack_path(&self, url: &str) -> PathBuf {
        self.root().join("dist").join(url)
    }
}

pub fn prompt_source(
    id: &str,
    location: &str,
    format: SourceFormat,
    language: &str,
    name: &str,
) -> PromptSourceConfig {
    PromptSourceConfig {
        id: id.to_string(),
        location: location.to_string(),
        format,
        language: language.to_string(),
        name: name.to_string(),
        platform: "roles".to_string(),
        enabled: true,
    }
}

pub fn assert_unique_ids(records: &[CanonicalRecord]) {
    let mut seen = HashSet::new();
    for record in records {
        assert!(seen.insert(record.id.as_str()), "duplicate id {}", record.id);
    }
}
