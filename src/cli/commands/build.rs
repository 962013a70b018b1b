//! packforge build - Build every configured source into packs
//!
//! Role-prompt sources become one pack each; every platform directory of
//! every cheat-sheet root becomes one command pack. A manifest indexing the
//! written packs is emitted at the end.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::build::{BuildEvent, BuildOptions, BuildReport, run_build};
use crate::cli::output::{self, HumanLayout};
use crate::cli::progress::{BuildProgress, ProgressMode};
use crate::error::Result;
use crate::utils::format::truncate_string;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Output directory (default: `output.dir` from the config)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Only build these languages (repeatable)
    #[arg(long = "lang", value_name = "LANG")]
    pub lang: Vec<String>,

    /// Skip role-prompt sources
    #[arg(long)]
    pub skip_prompts: bool,

    /// Skip cheat-sheet sources
    #[arg(long)]
    pub skip_commands: bool,
}

pub fn run(ctx: &AppContext, args: &BuildArgs) -> Result<()> {
    let mut config = ctx.config.clone();
    if !args.lang.is_empty() {
        config.languages.clone_from(&args.lang);
    }

    let mut options = BuildOptions::from_config(&config, &ctx.root);
    if let Some(out) = &args.out {
        options.out_dir = ctx.root.join(out);
    }
    options.prompts = !args.skip_prompts;
    options.commands = !args.skip_commands;

    let progress = BuildProgress::new(ProgressMode::detect(ctx.json, ctx.quiet));
    let result = run_build(&config, &ctx.root, &options, &|event: &BuildEvent| progress.observe(event));
    progress.finish();
    let report = result?;

    if ctx.json {
        let warnings = report
            .failures
            .iter()
            .map(|failure| format!("{}: {}", failure.source, failure.message))
            .collect();
        let packages = report.manifest.packages.len();
        return output::emit_json(&output::json_partial(&report, packages, warnings));
    }

    output::emit_human(render_report(&report));
    Ok(())
}

fn render_report(report: &BuildReport) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title(&format!(
        "{} {} packs, {} records",
        "Built".green().bold(),
        report.manifest.packages.len(),
        report.manifest.total_records()
    ));

    layout.section("Packs");
    for entry in &report.manifest.packages {
        layout.push_line(format!(
            "  {} {:>6}  {:>9}  {}",
            format!("{:<14}", entry.id).cyan(),
            entry.count,
            format!("{:.2} KB", entry.size_kb),
            entry.name
        ));
    }
    layout.blank();

    let drops = &report.drops;
    if drops.total() > 0 {
        layout.section("Dropped");
        for (label, count) in [
            ("empty title", drops.empty_title),
            ("empty body", drops.empty_body),
            ("empty content", drops.empty_content),
            ("unpaired action", drops.unpaired_action),
            ("empty command", drops.empty_command),
            ("malformed row", drops.malformed_row),
        ] {
            if count > 0 {
                layout.kv(label, &count.to_string());
            }
        }
        layout.blank();
    }

    if !report.failures.is_empty() {
        layout.section("Skipped sources");
        for failure in &report.failures {
            layout.bullet(&format!(
                "{} {} {}",
                failure.source.yellow(),
                format!("[{}]", failure.code.code_string()).dimmed(),
                truncate_string(&failure.message, 120)
            ));
        }
        layout.blank();
    }

    layout.kv("Manifest", &report.manifest_path.display().to_string());
    layout.kv("Duration", &format!("{} ms", report.duration_ms));
    layout
}
