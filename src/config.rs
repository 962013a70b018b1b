use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PackError, Result};
use crate::pipeline::classifier::{self, Category, CategoryClassifier, FALLBACK_CATEGORY};
use crate::pipeline::redactor::{self, ExampleRedactor, RedactionRule};
use crate::utils::format::title_case;

/// Project-level config file name, looked up in the working root.
pub const PROJECT_CONFIG_FILE: &str = "packforge.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Languages to build. Empty means every configured language.
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default = "default_prompt_sources")]
    pub prompts: Vec<PromptSourceConfig>,
    #[serde(default = "default_command_sources")]
    pub commands: Vec<CommandSourceConfig>,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub redaction: RedactionConfig,
}

/// Built-in configuration: both public prompt sources and both cheat-sheet
/// trees.
impl Default for Config {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            output: OutputConfig::default(),
            fetch: FetchConfig::default(),
            prompts: default_prompt_sources(),
            commands: default_command_sources(),
            classifier: ClassifierConfig::default(),
            redaction: RedactionConfig::default(),
        }
    }
}

impl Config {
    /// Defaults, then the global and project files (or one explicit file),
    /// then `PACKFORGE_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        Self::load_with(explicit_path, root, |key| std::env::var(key).ok())
    }

    /// [`Config::load`] with an injectable environment lookup.
    pub fn load_with(
        explicit_path: Option<&Path>,
        root: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env("PACKFORGE_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?
                .ok_or_else(|| PackError::MissingConfig(path.display().to_string()))?;
            config.merge_patch(patch)?;
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global)?;
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project)?;
            }
        }

        config.apply_overrides(&env)?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("packforge/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join(PROJECT_CONFIG_FILE))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        let Some(raw) = crate::utils::fs::read_optional(path)
            .map_err(|err| PackError::Config(format!("read config {}: {err}", path.display())))?
        else {
            return Ok(None);
        };
        let patch = toml::from_str(&raw)
            .map_err(|err| PackError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) -> Result<()> {
        if let Some(patch) = patch.output {
            self.output.merge(patch);
        }
        if let Some(patch) = patch.fetch {
            self.fetch.merge(patch);
        }
        for source in patch.prompts.unwrap_or_default() {
            merge_prompt_source(&mut self.prompts, source)?;
        }
        for source in patch.commands.unwrap_or_default() {
            merge_command_source(&mut self.commands, source)?;
        }
        if let Some(patch) = patch.classifier {
            self.classifier.merge(patch);
        }
        if let Some(patch) = patch.redaction {
            self.redaction.merge(patch);
        }
        if let Some(values) = patch.languages {
            self.languages = merge_unique(values, &[]);
        }
        Ok(())
    }

    fn apply_overrides(&mut self, env: &impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = env("PACKFORGE_OUT_DIR") {
            self.output.dir = PathBuf::from(value);
        }
        if let Some(value) = env_bool(env, "PACKFORGE_PRETTY") {
            self.output.pretty = value;
        }
        if let Some(values) = env_list(env, "PACKFORGE_LANGUAGES") {
            self.languages = values;
        }
        if let Some(value) = env_u64(env, "PACKFORGE_FETCH_TIMEOUT_SECS")? {
            self.fetch.timeout_secs = value;
        }
        if let Some(value) = env("PACKFORGE_USER_AGENT") {
            self.fetch.user_agent = value;
        }
        if let Some(value) = env_u64(env, "PACKFORGE_UNQUOTED_LIMIT")? {
            self.redaction.unquoted_limit = usize::try_from(value).map_err(|err| {
                PackError::Config(format!("invalid PACKFORGE_UNQUOTED_LIMIT value {value}: {err}"))
            })?;
        }
        Ok(())
    }

    /// Reject configurations that cannot produce a meaningful build.
    pub fn validate(&self) -> Result<()> {
        if self.output.dir.as_os_str().is_empty() {
            return Err(PackError::MissingConfig("output.dir".to_string()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(PackError::Config(
                "fetch.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.redaction.unquoted_limit == 0 {
            return Err(PackError::Config(
                "redaction.unquoted_limit must be greater than zero".to_string(),
            ));
        }

        let mut ids = HashSet::new();
        let mut packs = HashSet::new();
        for source in self.prompts.iter().filter(|source| source.enabled) {
            if !ids.insert(source.id.as_str()) {
                return Err(PackError::Config(format!(
                    "duplicate prompt source id '{}'",
                    source.id
                )));
            }
            if !packs.insert((source.language.as_str(), source.platform.as_str())) {
                return Err(PackError::Config(format!(
                    "prompt source '{}' writes the same pack as another source ({}-{})",
                    source.id, source.language, source.platform
                )));
            }
        }
        for category in &self.classifier.categories {
            if category.name.trim().is_empty() {
                return Err(PackError::Config(
                    "classifier category with empty name".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Whether `language` passes the `languages` allow-list.
    #[must_use]
    pub fn language_enabled(&self, language: &str) -> bool {
        self.languages.is_empty()
            || self
                .languages
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(language))
    }

    /// Enabled prompt sources whose language is allowed.
    pub fn active_prompt_sources(&self) -> impl Iterator<Item = &PromptSourceConfig> {
        self.prompts
            .iter()
            .filter(|source| source.enabled && self.language_enabled(&source.language))
    }

    /// Enabled cheat-sheet roots whose language is allowed.
    pub fn active_command_sources(&self) -> impl Iterator<Item = &CommandSourceConfig> {
        self.commands
            .iter()
            .filter(|source| source.enabled && self.language_enabled(&source.language))
    }

    /// Output directory resolved against `root`.
    #[must_use]
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.output.dir)
    }
}

// =============================================================================
// Sections
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub pretty: bool,
    #[serde(default = "default_manifest_version")]
    pub manifest_version: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            pretty: true,
            manifest_version: default_manifest_version(),
        }
    }
}

impl OutputConfig {
    fn merge(&mut self, patch: OutputPatch) {
        if let Some(value) = patch.dir {
            self.dir = value;
        }
        if let Some(value) = patch.pretty {
            self.pretty = value;
        }
        if let Some(value) = patch.manifest_version {
            self.manifest_version = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfig {
    fn merge(&mut self, patch: FetchPatch) {
        if let Some(value) = patch.timeout_secs {
            self.timeout_secs = value;
        }
        if let Some(value) = patch.user_agent {
            self.user_agent = value;
        }
    }
}

/// Tabular or structured role-prompt source encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Csv,
    Json,
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// One role-prompt source. `location` is an `http(s)://` URL or a path
/// relative to the working root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSourceConfig {
    pub id: String,
    pub location: String,
    pub format: SourceFormat,
    pub language: String,
    pub name: String,
    #[serde(default = "default_prompt_platform")]
    pub platform: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// One cheat-sheet tree: `<root>/<platform>/<command>.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSourceConfig {
    pub language: String,
    pub root: PathBuf,
    /// Platform directory name → display name.
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl CommandSourceConfig {
    /// Display name for `platform`, title-cased when not configured.
    #[must_use]
    pub fn display_name(&self, platform: &str) -> String {
        self.names
            .get(platform)
            .cloned()
            .unwrap_or_else(|| title_case(platform))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "classifier::default_categories")]
    pub categories: Vec<Category>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            categories: classifier::default_categories(),
            fallback: default_fallback(),
        }
    }
}

impl ClassifierConfig {
    fn merge(&mut self, patch: ClassifierPatch) {
        if let Some(categories) = patch.categories {
            self.categories = categories;
        }
        if let Some(value) = patch.fallback {
            self.fallback = value;
        }
    }

    #[must_use]
    pub fn build(&self) -> CategoryClassifier {
        CategoryClassifier::new(self.categories.clone(), self.fallback.clone())
    }
}

/// Extra redaction rule: a lead-clause regex for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionRuleConfig {
    pub language: String,
    pub lead: String,
    #[serde(default)]
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionConfig {
    #[serde(default = "default_unquoted_limit")]
    pub unquoted_limit: usize,
    #[serde(default)]
    pub rules: Vec<RedactionRuleConfig>,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            unquoted_limit: default_unquoted_limit(),
            rules: Vec::new(),
        }
    }
}

impl RedactionConfig {
    fn merge(&mut self, patch: RedactionPatch) {
        if let Some(value) = patch.unquoted_limit {
            self.unquoted_limit = value;
        }
        for rule in patch.rules.unwrap_or_default() {
            self.rules.retain(|existing| existing.language != rule.language);
            self.rules.push(rule);
        }
    }

    /// Built-in rules plus configured ones; a configured rule replaces the
    /// built-in rule of the same language.
    pub fn build(&self) -> Result<ExampleRedactor> {
        self.rules.iter().try_fold(
            ExampleRedactor::new(self.unquoted_limit),
            |redactor, rule| {
                let rule = RedactionRule::new(&rule.language, &rule.lead, rule.case_insensitive)?;
                Ok(redactor.with_rule(rule))
            },
        )
    }
}

// =============================================================================
// Patches
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub output: Option<OutputPatch>,
    pub fetch: Option<FetchPatch>,
    pub prompts: Option<Vec<PromptSourcePatch>>,
    pub commands: Option<Vec<CommandSourcePatch>>,
    pub classifier: Option<ClassifierPatch>,
    pub redaction: Option<RedactionPatch>,
    pub languages: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct OutputPatch {
    pub dir: Option<PathBuf>,
    pub pretty: Option<bool>,
    pub manifest_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FetchPatch {
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

/// Prompt sources merge by `id`: a known id updates the given fields, an
/// unknown id must be complete.
#[derive(Debug, Clone, Default, Deserialize)]
struct PromptSourcePatch {
    pub id: String,
    pub location: Option<String>,
    pub format: Option<SourceFormat>,
    pub language: Option<String>,
    pub name: Option<String>,
    pub platform: Option<String>,
    pub enabled: Option<bool>,
}

/// Command sources merge by `language`; display names are merged per key.
#[derive(Debug, Clone, Default, Deserialize)]
struct CommandSourcePatch {
    pub language: String,
    pub root: Option<PathBuf>,
    pub names: Option<BTreeMap<String, String>>,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ClassifierPatch {
    pub categories: Option<Vec<Category>>,
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RedactionPatch {
    pub unquoted_limit: Option<usize>,
    pub rules: Option<Vec<RedactionRuleConfig>>,
}

fn merge_prompt_source(sources: &mut Vec<PromptSourceConfig>, patch: PromptSourcePatch) -> Result<()> {
    if let Some(existing) = sources.iter_mut().find(|source| source.id == patch.id) {
        if let Some(value) = patch.location {
            existing.location = value;
        }
        if let Some(value) = patch.format {
            existing.format = value;
        }
        if let Some(value) = patch.language {
            existing.language = value;
        }
        if let Some(value) = patch.name {
            existing.name = value;
        }
        if let Some(value) = patch.platform {
            existing.platform = value;
        }
        if let Some(value) = patch.enabled {
            existing.enabled = value;
        }
        return Ok(());
    }

    let missing = |field: &str| PackError::MissingConfig(format!("prompts.{}.{field}", patch.id));
    let location = patch.location.ok_or_else(|| missing("location"))?;
    let format = patch.format.ok_or_else(|| missing("format"))?;
    let language = patch.language.ok_or_else(|| missing("language"))?;
    sources.push(PromptSourceConfig {
        name: patch.name.unwrap_or_else(|| patch.id.clone()),
        id: patch.id,
        location,
        format,
        language,
        platform: patch.platform.unwrap_or_else(default_prompt_platform),
        enabled: patch.enabled.unwrap_or(true),
    });
    Ok(())
}

fn merge_command_source(
    sources: &mut Vec<CommandSourceConfig>,
    patch: CommandSourcePatch,
) -> Result<()> {
    if let Some(existing) = sources
        .iter_mut()
        .find(|source| source.language == patch.language)
    {
        if let Some(value) = patch.root {
            existing.root = value;
        }
        existing.names.extend(patch.names.unwrap_or_default());
        if let Some(value) = patch.enabled {
            existing.enabled = value;
        }
        return Ok(());
    }

    let root = patch
        .root
        .ok_or_else(|| PackError::MissingConfig(format!("commands.{}.root", patch.language)))?;
    sources.push(CommandSourceConfig {
        language: patch.language,
        root,
        names: patch.names.unwrap_or_default(),
        enabled: patch.enabled.unwrap_or(true),
    });
    Ok(())
}

// =============================================================================
// Defaults
// =============================================================================

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

const fn default_true() -> bool {
    true
}

fn default_manifest_version() -> String {
    "1.0.0".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("packforge/{}", env!("CARGO_PKG_VERSION"))
}

fn default_prompt_platform() -> String {
    "roles".to_string()
}

fn default_fallback() -> String {
    FALLBACK_CATEGORY.to_string()
}

const fn default_unquoted_limit() -> usize {
    redactor::DEFAULT_UNQUOTED_LIMIT
}

fn default_prompt_sources() -> Vec<PromptSourceConfig> {
    vec![
        PromptSourceConfig {
            id: "en_roles".to_string(),
            location: "https://raw.githubusercontent.com/f/awesome-chatgpt-prompts/main/prompts.csv"
                .to_string(),
            format: SourceFormat::Csv,
            language: "en".to_string(),
            name: "ChatGPT Prompts (English)".to_string(),
            platform: default_prompt_platform(),
            enabled: true,
        },
        PromptSourceConfig {
            id: "zh_roles".to_string(),
            location:
                "https://raw.githubusercontent.com/PlexPt/awesome-chatgpt-prompts-zh/main/prompts-zh.json"
                    .to_string(),
            format: SourceFormat::Json,
            language: "zh".to_string(),
            name: "中文角色扮演精选".to_string(),
            platform: default_prompt_platform(),
            enabled: true,
        },
    ]
}

fn default_command_sources() -> Vec<CommandSourceConfig> {
    let names = |pairs: &[(&str, &str)]| {
        pairs
            .iter()
            .map(|(platform, name)| ((*platform).to_string(), (*name).to_string()))
            .collect::<BTreeMap<_, _>>()
    };

    vec![
        CommandSourceConfig {
            language: "zh".to_string(),
            root: PathBuf::from("tldr/pages.zh"),
            names: names(&[
                ("common", "通用工具 (Common)"),
                ("linux", "Linux 运维"),
                ("android", "Android 开发"),
                ("windows", "Windows"),
                ("osx", "macOS"),
                ("sunos", "SunOS"),
            ]),
            enabled: true,
        },
        CommandSourceConfig {
            language: "en".to_string(),
            root: PathBuf::from("tldr/pages"),
            names: names(&[
                ("common", "Common Tools"),
                ("linux", "Linux Ops"),
                ("android", "Android Dev"),
                ("windows", "Windows"),
                ("osx", "macOS"),
                ("sunos", "SunOS"),
            ]),
            enabled: true,
        },
    ]
}

// =============================================================================
// Environment helpers
// =============================================================================

fn merge_unique(values: Vec<String>, existing: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for value in values.into_iter().chain(existing.iter().cloned()) {
        if seen.insert(value.clone()) {
            out.push(value);
        }
    }
    out
}

fn env_bool(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    env(key).map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_u64(env: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    match env(key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|err| PackError::Config(format!("invalid {key} value {value}: {err}"))),
        None => Ok(None),
    }
}

fn env_list(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Vec<String>> {
    env(key).map(|value| {
        let list = value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToString::to_string)
            .collect();
        merge_unique(list, &[])
    })
}
