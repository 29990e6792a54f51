use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::Utc;
use clap::Subcommand;
use rulesmith_core::{
    config::Config,
    ledger::{self, Checklist, ItemState},
};
use std::path::Path;

#[derive(Subcommand)]
pub enum LedgerSubcommand {
    /// Mark an item done (exact description match)
    MarkDone {
        item: String,
        /// Note recorded next to the completion timestamp
        #[arg(long)]
        note: Option<String>,
        /// Completion time, RFC 3339 or YYYY-MM-DD (default: now)
        #[arg(long, value_name = "TIMESTAMP")]
        at: Option<String>,
    },
    /// Mark a pending item blocked
    MarkBlocked {
        item: String,
        #[arg(required = true)]
        reason: Vec<String>,
    },
    /// Append a pending item to a section, creating the section if needed
    Add {
        section: String,
        #[arg(required = true)]
        item: Vec<String>,
    },
    /// List items with their state
    List,
    /// Show the first pending item
    Next,
}

pub fn run(
    root: &Path,
    file: Option<&Path>,
    subcmd: LedgerSubcommand,
    json: bool,
) -> anyhow::Result<()> {
    let path = match file {
        Some(f) => f.to_path_buf(),
        None => Config::load_or_default(root)
            .context("failed to load config")?
            .ledger_path(root),
    };

    match subcmd {
        LedgerSubcommand::MarkDone { item, note, at } => {
            mark_done(&path, &item, note.as_deref(), at.as_deref(), json)
        }
        LedgerSubcommand::MarkBlocked { item, reason } => {
            mark_blocked(&path, &item, &reason.join(" "), json)
        }
        LedgerSubcommand::Add { section, item } => add(&path, &section, &item.join(" "), json),
        LedgerSubcommand::List => list(&path, json),
        LedgerSubcommand::Next => next(&path, json),
    }
}

fn load(path: &Path) -> anyhow::Result<Checklist> {
    Checklist::load(path).with_context(|| format!("failed to read ledger {}", path.display()))
}

fn save(path: &Path, doc: &Checklist) -> anyhow::Result<()> {
    doc.save(path)
        .with_context(|| format!("failed to write ledger {}", path.display()))?;
    tracing::debug!(path = %path.display(), "saved ledger");
    Ok(())
}

fn mark_done(
    path: &Path,
    item: &str,
    note: Option<&str>,
    at: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let at = match at {
        Some(s) => ledger::parse_timestamp(s)?,
        None => Utc::now(),
    };
    let mut doc = load(path)?;
    doc.mark_done(item, at, note)?;
    save(path, &doc)?;

    if json {
        print_json(&serde_json::json!({
            "item": item,
            "state": "done",
            "completed_at": ledger::format_timestamp(at),
            "note": note,
        }))?;
    } else {
        println!("Done: {item}");
    }
    Ok(())
}

fn mark_blocked(path: &Path, item: &str, reason: &str, json: bool) -> anyhow::Result<()> {
    let mut doc = load(path)?;
    doc.mark_blocked(item, reason)?;
    save(path, &doc)?;

    if json {
        print_json(&serde_json::json!({
            "item": item,
            "state": "blocked",
            "reason": reason,
        }))?;
    } else {
        println!("Blocked: {item} ({reason})");
    }
    Ok(())
}

fn add(path: &Path, section: &str, item: &str, json: bool) -> anyhow::Result<()> {
    let mut doc = if path.exists() {
        load(path)?
    } else {
        Checklist::default()
    };
    doc.add_item(section, item);
    save(path, &doc)?;

    if json {
        print_json(&serde_json::json!({ "section": section, "item": item, "state": "pending" }))?;
    } else {
        println!("Added to '{section}': {item}");
    }
    Ok(())
}

fn list(path: &Path, json: bool) -> anyhow::Result<()> {
    let doc = load(path)?;

    if json {
        let mut items = Vec::new();
        for section in doc.sections() {
            for item in section.items() {
                let mut value = serde_json::to_value(item)?;
                if let Some(obj) = value.as_object_mut() {
                    obj.insert("section".to_string(), serde_json::json!(section.title()));
                }
                items.push(value);
            }
        }
        print_json(&items)?;
        return Ok(());
    }

    if doc.items().next().is_none() {
        println!("No checklist items in {}.", path.display());
        return Ok(());
    }

    println!("{}", doc.summarize());
    println!();

    let rows: Vec<Vec<String>> = doc
        .sections()
        .iter()
        .flat_map(|s| s.items().map(move |i| (s.title().unwrap_or(""), i)))
        .map(|(section, item)| {
            let detail = match item.state() {
                ItemState::Blocked { reason } => reason.clone(),
                ItemState::Done => item
                    .completed_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
                ItemState::Pending => String::new(),
            };
            vec![
                item.state().to_string(),
                section.to_string(),
                item.description().to_string(),
                detail,
            ]
        })
        .collect();
    print_table(&["STATE", "SECTION", "ITEM", "DETAIL"], rows);
    Ok(())
}

fn next(path: &Path, json: bool) -> anyhow::Result<()> {
    let doc = load(path)?;
    let item = doc.next_item();

    if json {
        print_json(&item)?;
    } else {
        match item {
            Some(i) => println!("{}", i.description()),
            None => println!("Nothing pending. {}", doc.summarize()),
        }
    }
    Ok(())
}
