use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use rulesmith_core::{config::Config, rule::RuleLibrary};
use std::path::Path;

#[derive(Subcommand)]
pub enum RulesSubcommand {
    /// List rule documents available for composition
    List,
    /// Print a single rule document
    Show { name: String },
}

pub fn run(root: &Path, subcmd: RulesSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    let rules_dir = config.rules_dir(root);
    let library = RuleLibrary::load(&rules_dir)
        .with_context(|| format!("failed to load rules from {}", rules_dir.display()))?;

    match subcmd {
        RulesSubcommand::List => list(&library, &config, json),
        RulesSubcommand::Show { name } => show(&library, &name, json),
    }
}

fn list(library: &RuleLibrary, config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        let items: Vec<serde_json::Value> = library
            .documents()
            .map(|doc| {
                serde_json::json!({
                    "name": doc.name(),
                    "lines": doc.lines().len(),
                    "default": config.rules.default_order.iter().any(|n| n == doc.name()),
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if library.is_empty() {
        println!("No rule documents.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = library
        .documents()
        .map(|doc| {
            let position = config
                .rules
                .default_order
                .iter()
                .position(|n| n == doc.name())
                .map(|i| (i + 1).to_string())
                .unwrap_or_default();
            vec![
                doc.name().to_string(),
                doc.lines().len().to_string(),
                position,
            ]
        })
        .collect();
    print_table(&["NAME", "LINES", "DEFAULT ORDER"], rows);
    Ok(())
}

fn show(library: &RuleLibrary, name: &str, json: bool) -> anyhow::Result<()> {
    let doc = library.get(name)?;
    if json {
        print_json(doc)?;
    } else {
        println!("{}", doc.content());
    }
    Ok(())
}
