//! packforge extract - Extract command records from one cheat-sheet page

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output::{self, HumanLayout};
use crate::error::Result;
use crate::pipeline::assembler::RecordAssembler;
use crate::pipeline::commands::Extraction;
use crate::sources;
use crate::utils::format::title_case;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Cheat-sheet page; the file stem is the command name
    pub file: PathBuf,

    /// Language of the page
    #[arg(long)]
    pub lang: String,

    /// Platform the page belongs to (e.g. linux, common)
    #[arg(long)]
    pub platform: String,

    /// Group name for the records (default: configured platform name)
    #[arg(long)]
    pub display_name: Option<String>,
}

pub fn run(ctx: &AppContext, args: &ExtractArgs) -> Result<()> {
    let entry = sources::read_page(&ctx.root.join(&args.file), &args.lang, &args.platform)?;
    let display_name = args
        .display_name
        .clone()
        .unwrap_or_else(|| configured_display_name(ctx, &args.lang, &args.platform));

    let assembler = RecordAssembler::new(
        ctx.config.classifier.build(),
        ctx.config.redaction.build()?,
        chrono::Utc::now().timestamp_millis(),
    );
    let extraction = assembler.assemble_commands(&entry, &display_name);

    if ctx.json {
        return output::emit_json(&output::json_ok(json!({
            "command": entry.title,
            "records": extraction.records,
            "drops": extraction.drops,
        })));
    }
    output::emit_human(render_extraction(&entry.title, &extraction));
    Ok(())
}

fn configured_display_name(ctx: &AppContext, language: &str, platform: &str) -> String {
    ctx.config
        .commands
        .iter()
        .find(|source| source.language.eq_ignore_ascii_case(language))
        .map_or_else(|| title_case(platform), |source| source.display_name(platform))
}

fn render_extraction(command: &str, extraction: &Extraction) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title(&format!(
        "{} {} records",
        command.cyan().bold(),
        extraction.records.len()
    ));
    for record in &extraction.records {
        layout
            .push_line(format!("{} {}", "-".dimmed(), record.title))
            .push_line(format!("  {}", record.content.green()));
    }
    let dropped = extraction.drops.total();
    if dropped > 0 {
        layout.blank().kv("Dropped", &dropped.to_string());
    }
    layout
}
