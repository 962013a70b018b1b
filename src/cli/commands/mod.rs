//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::error::Result;

pub mod build;
pub mod config;
pub mod extract;
pub mod preview;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Build(args) => build::run(ctx, args),
        Commands::Preview(args) => preview::run(ctx, args),
        Commands::Extract(args) => extract::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
    }
}
