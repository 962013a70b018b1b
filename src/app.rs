//! Per-invocation application context shared by every command.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::{PackError, Result};

/// Resolved configuration and output preferences for one CLI run.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Config,
    /// Working root: relative source locations and the output dir resolve here.
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let root = std::env::current_dir()
            .map_err(|err| PackError::Config(format!("resolve working directory: {err}")))?;
        Self::load(cli, &root)
    }

    /// Build a context rooted at `root` instead of the working directory.
    pub fn load(cli: &Cli, root: &Path) -> Result<Self> {
        let config = Config::load(cli.config.as_deref(), root)?;
        debug!(
            root = %root.display(),
            languages = ?config.languages,
            prompt_sources = config.prompts.len(),
            command_sources = config.commands.len(),
            "configuration loaded"
        );
        Ok(Self {
            config,
            root: root.to_path_buf(),
            config_path: cli.config.clone(),
            json: cli.json,
            quiet: cli.quiet,
        })
    }
}
