mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{
    bump::BumpArgs, compose::ComposeArgs, config::ConfigSubcommand, ledger::LedgerSubcommand,
    rules::RulesSubcommand,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "rulesmith",
    about = "Compose assistant rule files, plan semantic-version bumps, and keep TODO checklists current",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .rulesmith/ or .git/)
    #[arg(long, global = true, env = "RULESMITH_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold .rulesmith/config.yaml, a starter rule, and TODO.md
    Init,

    /// Concatenate rule documents into one assistant config file
    Compose(ComposeArgs),

    /// Inspect available rule documents
    Rules {
        #[command(subcommand)]
        subcommand: RulesSubcommand,
    },

    /// Compute the next semantic version from conventional commits
    Bump(BumpArgs),

    /// Read and update the checklist progress document
    Ledger {
        /// Checklist file (default: ledger.path from config)
        #[arg(long, short = 'f', global = true)]
        file: Option<PathBuf>,

        #[command(subcommand)]
        subcommand: LedgerSubcommand,
    },

    /// Validate or print the project configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    // stderr keeps stdout clean for --stdout and --json
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved project root");

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root, cli.json),
        Commands::Compose(args) => cmd::compose::run(&root, args, cli.json),
        Commands::Rules { subcommand } => cmd::rules::run(&root, subcommand, cli.json),
        Commands::Bump(args) => cmd::bump::run(&root, args, cli.json),
        Commands::Ledger { file, subcommand } => {
            cmd::ledger::run(&root, file.as_deref(), subcommand, cli.json)
        }
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
