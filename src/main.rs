use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::debug;

use binextract::config;
use binextract::docker::{self, InterruptFlag, SystemRunner};
use binextract::pipeline;

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr and stay quiet unless `RUST_LOG` asks for more;
/// progress lines are printed directly.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
}

fn run() -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("failed to determine the current directory")?;
    let cfg = config::load(&cwd)?;
    debug!(?cfg, "configuration loaded");

    let interrupt = InterruptFlag::new();
    if !docker::install_interrupt_handler(&interrupt) {
        debug!("no interrupt handler installed; cleanup will not run if killed");
    }

    let runner = SystemRunner::new(&cfg.tool, &cwd);
    let report = pipeline::run_extraction(&cfg, &cwd, &runner, &interrupt);

    if let Some((phase, reason)) = report.failure() {
        debug!(%phase, reason, "run failed");
    }
    Ok(ExitCode::from(report.exit_code()))
}
