use crate::output::print_json;
use anyhow::Context;
use clap::Args;
use rulesmith_core::{
    compose::{compose, compose_section, SECTION_END, SECTION_START},
    config::Config,
    io::{self, SectionWrite},
    rule::RuleLibrary,
};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct ComposeArgs {
    /// Rule documents in output order (default: rules.default_order)
    pub names: Vec<String>,

    /// Destination file (default: rules.output)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Print to stdout instead of writing a file
    #[arg(long, conflicts_with_all = ["output", "section"])]
    pub stdout: bool,

    /// Write into a managed <!-- rulesmith:start/end --> block, keeping the rest of the file
    #[arg(long)]
    pub section: bool,

    /// Rules directory (default: rules.dir)
    #[arg(long)]
    pub rules_dir: Option<PathBuf>,
}

pub fn run(root: &Path, args: ComposeArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    let rules_dir = args
        .rules_dir
        .clone()
        .unwrap_or_else(|| config.rules_dir(root));
    let library = RuleLibrary::load(&rules_dir)
        .with_context(|| format!("failed to load rules from {}", rules_dir.display()))?;
    tracing::debug!(dir = %rules_dir.display(), count = library.len(), "loaded rule documents");

    let names = if args.names.is_empty() {
        config.rules.default_order.clone()
    } else {
        args.names
    };
    let body = compose(&library, &names)?;

    if args.stdout {
        if json {
            print_json(&serde_json::json!({ "documents": names, "content": body }))?;
        } else if !body.is_empty() {
            println!("{body}");
        }
        return Ok(());
    }

    let target = args.output.unwrap_or_else(|| config.output_path(root));
    let mode = if args.section {
        let block = compose_section(&body);
        let outcome = io::upsert_marked_section(&target, SECTION_START, SECTION_END, &block)
            .with_context(|| format!("failed to write {}", target.display()))?;
        match outcome {
            SectionWrite::Created => "created",
            SectionWrite::Replaced => "replaced",
            SectionWrite::Appended => "appended",
        }
    } else {
        let data = if body.is_empty() {
            String::new()
        } else {
            format!("{body}\n")
        };
        io::atomic_write(&target, data.as_bytes())
            .with_context(|| format!("failed to write {}", target.display()))?;
        "written"
    };
    tracing::info!(target = %target.display(), documents = names.len(), mode, "composed rules");

    if json {
        print_json(&serde_json::json!({
            "output": target.display().to_string(),
            "documents": names,
            "mode": mode,
        }))?;
    } else {
        println!(
            "Composed {} document(s) into {} ({mode})",
            names.len(),
            target.display()
        );
    }
    Ok(())
}
