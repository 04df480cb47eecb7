// src/bin/deadwood.rs
use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use deadwood_core::config::ScanConfig;
use deadwood_core::engine::Engine;
use deadwood_core::vcs::{FixedOracle, GitStatusOracle, StatusOracle};
use deadwood_core::{report, summary};
use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "deadwood", version, about = "Find backup files, stale copies, and abandoned code")]
struct Cli {
    /// Root directories to scan
    #[arg(value_name = "ROOT", default_value = ".")]
    roots: Vec<PathBuf>,

    /// Emit the full structured report as JSON to stdout
    #[arg(long)]
    json: bool,

    /// Write the JSON report to a file
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of high-confidence findings shown in the human summary
    #[arg(long, default_value = "10")]
    top: usize,

    /// Skip the git status oracle (every file is treated as untracked)
    #[arg(long)]
    no_git: bool,

    /// Best-effort scan deadline in seconds
    #[arg(long, value_name = "SECS")]
    deadline_secs: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {e}", "Error:".red().bold());
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = ScanConfig::new(cli.roots.clone());
    config.verbose = cli.verbose;
    config.deadline = cli.deadline_secs.map(Duration::from_secs);
    config.load_overlay()?;

    let git_oracle;
    let fixed_oracle;
    let oracle: &dyn StatusOracle = if cli.no_git {
        fixed_oracle = FixedOracle::new();
        &fixed_oracle
    } else {
        let root = cli.roots.first().cloned().unwrap_or_else(|| PathBuf::from("."));
        git_oracle = GitStatusOracle::snapshot(&root);
        &git_oracle
    };

    let engine = Engine::new(config);
    let scan = engine.run(oracle)?;

    if let Some(path) = &cli.output {
        fs::write(path, report::to_json(&scan)?)?;
        if cli.verbose {
            eprintln!("report written to {}", path.display());
        }
    }

    if cli.json {
        println!("{}", report::to_json(&scan)?);
    } else {
        summary::print(&scan, cli.top);
    }

    Ok(())
}
