//! packforge preview - Run one role prompt through the pipeline

use std::path::PathBuf;

use clap::{ArgGroup, Args};
use colored::Colorize;
use serde_json::json;

use crate::app::AppContext;
use crate::cli::output::{self, HumanLayout};
use crate::error::{PackError, Result};
use crate::pipeline::assembler::RecordAssembler;
use crate::pipeline::types::{CanonicalRecord, EntryOutcome, RawEntry};

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("body").required(true).args(["text", "file"])))]
pub struct PreviewArgs {
    /// Language of the prompt
    #[arg(long)]
    pub lang: String,

    /// Role title
    #[arg(long)]
    pub title: String,

    /// Prompt body
    #[arg(long)]
    pub text: Option<String>,

    /// Read the prompt body from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &PreviewArgs) -> Result<()> {
    let body = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => {
            let path = ctx.root.join(path);
            std::fs::read_to_string(&path).map_err(|err| PackError::Document {
                path: path.display().to_string(),
                reason: err.to_string(),
            })?
        }
        (None, None) => return Err(PackError::Config("one of --text or --file is required".into())),
    };

    let assembler = RecordAssembler::new(
        ctx.config.classifier.build(),
        ctx.config.redaction.build()?,
        chrono::Utc::now().timestamp_millis(),
    );
    let entry = RawEntry::role_prompt(&args.title, body, &args.lang);

    match assembler.assemble_prompt(&entry) {
        EntryOutcome::Emitted(record) => {
            if ctx.json {
                return output::emit_json(&output::json_ok(&record));
            }
            output::emit_human(render_record(&record));
        }
        EntryOutcome::Dropped(reason) => {
            if ctx.json {
                return output::emit_json(&output::json_ok(json!({ "dropped": reason })));
            }
            println!("{} {}", "Dropped:".yellow().bold(), json!(reason).as_str().unwrap_or_default());
        }
    }
    Ok(())
}

fn render_record(record: &CanonicalRecord) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title(&record.title);
    layout
        .kv("Group", &record.group)
        .kv("Tags", &record.tags.join(", "))
        .kv("Description", &record.description)
        .blank()
        .push_line(record.content.clone());
    layout
}
