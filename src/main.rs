mod builder;
mod config;
mod error;
mod loader;
mod logging;
mod report;
mod runner;
mod schema;
mod script;
mod tokens;

use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "e2e-harness")]
#[command(about = "Build a binary and run declarative shell suites against it")]
#[command(version)]
struct Cli {
    /// Spec files (or directories of spec files) to run, in order
    #[arg(required = true)]
    specs: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    match run(&cli.specs) {
        Ok(summary) if summary.failed > 0 => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::from(2)
        }
    }
}

fn run(specs: &[PathBuf]) -> error::Result<runner::RunSummary> {
    let config = config::HarnessConfig::from_env()?;
    let files = loader::expand_paths(specs)?;

    builder::build(&config.build)?;
    let ctx = runner::RunContext::new(&config);

    let summary = runner::run_files(&files, &ctx)?;
    tracing::debug!(
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        "run finished"
    );
    Ok(summary)
}
