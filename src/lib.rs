pub mod app;
pub mod build;
pub mod cli;
pub mod config;
pub mod error;
pub mod packs;
pub mod pipeline;
pub mod sources;
pub mod test_utils;
pub mod utils;

pub use error::{PackError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
