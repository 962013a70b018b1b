//! packforge config - Show the effective configuration

use clap::Args;

use crate::app::AppContext;
use crate::cli::output;
use crate::config::Config;
use crate::error::{PackError, Result};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Dotted configuration key to show (e.g. `output.dir`)
    pub key: Option<String>,
}

pub fn run(ctx: &AppContext, args: &ConfigArgs) -> Result<()> {
    match &args.key {
        Some(key) => get_key(ctx, key),
        None => emit_config(ctx),
    }
}

fn emit_config(ctx: &AppContext) -> Result<()> {
    if ctx.json {
        return output::emit_json(&output::json_ok(&ctx.config));
    }

    let rendered = toml::to_string_pretty(&ctx.config)
        .map_err(|err| PackError::Config(format!("render config: {err}")))?;
    println!("{rendered}");
    Ok(())
}

fn get_key(ctx: &AppContext, key: &str) -> Result<()> {
    let value = config_value_at(&ctx.config, key)?;
    if ctx.json {
        return output::emit_json(&output::json_ok(&value));
    }
    println!("{}", format_value(&value));
    Ok(())
}

fn config_value_at(config: &Config, key: &str) -> Result<toml::Value> {
    let doc = toml::Value::try_from(config)
        .map_err(|err| PackError::Config(format!("serialize config: {err}")))?;
    get_path(&doc, key)
}

/// Walk a dotted key; numeric segments index into arrays (`prompts.0.id`).
fn get_path(doc: &toml::Value, key: &str) -> Result<toml::Value> {
    let mut current = doc;
    for part in key.split('.') {
        let next = match current {
            toml::Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => current.get(part),
        };
        current = next.ok_or_else(|| PackError::NotFound(format!("unknown config key: {key}")))?;
    }
    Ok(current.clone())
}

fn format_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        _ => value.to_string(),
    }
}
