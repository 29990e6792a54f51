use crate::output::print_json;
use anyhow::Context;
use clap::Args;
use rulesmith_core::{
    commit::{split_messages, CommitRecord},
    config::Config,
    version::{self, Version},
};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct BumpArgs {
    /// Current version, e.g. 1.4.2 (a tag such as v1.4.2 is accepted)
    pub current: String,

    /// File of commit messages since the last release, one per line or
    /// NUL-separated (`git log -z --format=%B`). Use `-` for stdin.
    #[arg(long, value_name = "FILE")]
    pub from_commits: PathBuf,

    /// Print the next version with the configured tag prefix
    #[arg(long)]
    pub tag: bool,
}

pub fn run(root: &Path, args: BumpArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load_or_default(root).context("failed to load config")?;
    let current: Version = config.release.strip_tag(&args.current).parse()?;

    let input = read_commits(&args.from_commits)?;
    let commits = CommitRecord::from_messages(split_messages(&input));
    let plan = version::plan(&commits);
    let next = current.bump(plan.bump)?;
    tracing::info!(
        commits = plan.total(),
        breaking = plan.breaking,
        features = plan.features,
        bump = %plan.bump,
        "planned release"
    );

    let rendered = if args.tag {
        config.release.tag(next)
    } else {
        next.to_string()
    };

    if json {
        print_json(&serde_json::json!({
            "current": current.to_string(),
            "next": rendered,
            "bump": plan.bump,
            "commits": plan.total(),
            "breaking": plan.breaking,
            "features": plan.features,
            "fixes": plan.fixes,
            "other": plan.other,
        }))?;
    } else {
        println!("{rendered}");
    }
    Ok(())
}

fn read_commits(source: &Path) -> anyhow::Result<String> {
    if source.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read commits from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(source)
        .with_context(|| format!("failed to read commits from {}", source.display()))
}
