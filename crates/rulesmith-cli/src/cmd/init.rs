use crate::output::print_json;
use anyhow::Context;
use rulesmith_core::{
    config::{self, Config},
    io, paths,
};
use std::path::Path;

const GENERAL_RULES: &str = "\
# General

- Read the existing code before changing it and follow its conventions.
- Keep changes small and focused; one concern per commit.
- Use conventional commit messages (`feat:`, `fix:`, `docs:`, ...).
- Keep TODO.md up to date: mark items done as you finish them.
";

const LEDGER_TEMPLATE: &str = "\
# TODO

## Plan
- [ ] Describe the goal and list the steps

## Release
- [ ] Run the test suite
- [ ] Bump the version
";

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let mut created = Vec::new();
    if !json {
        println!("Initializing rulesmith in: {}", root.display());
    }

    // 1. Config
    let rulesmith_dir = paths::rulesmith_dir(root);
    io::ensure_dir(&rulesmith_dir)
        .with_context(|| format!("failed to create {}", rulesmith_dir.display()))?;
    let config = if paths::config_path(root).exists() {
        report(json, "exists: ", paths::CONFIG_FILE);
        Config::load(root).context("failed to load config")?
    } else {
        let cfg = Config::new(config::project_name(root));
        cfg.save(root).context("failed to write config.yaml")?;
        report(json, "created:", paths::CONFIG_FILE);
        created.push(paths::CONFIG_FILE.to_string());
        cfg
    };

    // 2. Starter rule document
    let rules_dir = config.rules_dir(root);
    io::ensure_dir(&rules_dir)
        .with_context(|| format!("failed to create {}", rules_dir.display()))?;
    let general = paths::rule_file(&rules_dir, "general");
    let general_label = format!("{}/general.{}", config.rules.dir, paths::RULE_EXTENSION);
    if io::write_if_missing(&general, GENERAL_RULES.as_bytes())? {
        report(json, "created:", &general_label);
        created.push(general_label);
    } else {
        report(json, "exists: ", &general_label);
    }

    // 3. Checklist ledger
    let ledger = config.ledger_path(root);
    if io::write_if_missing(&ledger, LEDGER_TEMPLATE.as_bytes())? {
        report(json, "created:", &config.ledger.path);
        created.push(config.ledger.path.clone());
    } else {
        report(json, "exists: ", &config.ledger.path);
    }
    tracing::info!(created = created.len(), "initialized project");

    if json {
        print_json(&serde_json::json!({ "root": root.display().to_string(), "created": created }))?;
    } else {
        println!("\nrulesmith initialized successfully.");
        println!("Next: rulesmith compose");
    }
    Ok(())
}

fn report(json: bool, status: &str, path: &str) {
    if !json {
        println!("  {status} {path}");
    }
}
