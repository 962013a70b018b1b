//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;
pub mod progress;

/// packforge - Normalize role prompts and command cheat-sheets into packs
#[derive(Parser, Debug)]
#[command(name = "packforge")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Machine-readable JSON on stdout and JSON logs on stderr
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress logs and progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (replaces the global and project config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build every configured source into packs and write the manifest
    Build(commands::build::BuildArgs),

    /// Run one role prompt through the pipeline and print the record
    Preview(commands::preview::PreviewArgs),

    /// Extract command records from one cheat-sheet page
    Extract(commands::extract::ExtractArgs),

    /// Show the effective configuration
    Config(commands::config::ConfigArgs),
}
