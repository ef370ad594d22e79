use std::path::Path;

use tracing::{debug, info};

use crate::config::Config;
use crate::docker::{CommandRunner, InterruptFlag, ToolCommand};

use super::commands::{
    build_command, container_name, copy_command, create_command, remove_command,
};
use super::types::{CleanupStatus, Phase, PhaseStatus, RunReport};

/// Build the image, copy every artifact out of a throwaway container, and
/// remove the container again.
///
/// Never returns early without cleanup once a container exists: removal runs
/// exactly once after creation succeeds, on every path out of this function
/// including a panic in the runner.
pub fn run_extraction(
    cfg: &Config,
    work_dir: &Path,
    runner: &dyn CommandRunner,
    interrupt: &InterruptFlag,
) -> RunReport {
    println!("\n=== starting build and extraction ===");
    let mut report = RunReport::pending(cfg);
    run_phases(cfg, work_dir, runner, interrupt, &mut report);
    println!("\n=== finished ===");
    report
}

fn run_phases(
    cfg: &Config,
    work_dir: &Path,
    runner: &dyn CommandRunner,
    interrupt: &InterruptFlag,
    report: &mut RunReport,
) {
    // ── Precondition ─────────────────────────────────────────────────
    if let Err(e) = cfg.validate() {
        eprintln!("error: invalid configuration: {e:#}");
        report.set(
            &Phase::Precondition,
            PhaseStatus::Failed(format!("invalid configuration: {e}")),
        );
        return;
    }
    if !work_dir.join(&cfg.build_file).is_file() {
        eprintln!(
            "error: {} not found in the current directory.",
            cfg.build_file
        );
        eprintln!("please run this script from the project root.");
        report.set(
            &Phase::Precondition,
            PhaseStatus::Failed(format!("{} not found", cfg.build_file)),
        );
        return;
    }
    report.set(&Phase::Precondition, PhaseStatus::Succeeded);

    // ── Build ────────────────────────────────────────────────────────
    if !step(runner, interrupt, &build_command(cfg), &Phase::Build, report) {
        return;
    }

    // ── Create ───────────────────────────────────────────────────────
    let container = container_name(cfg);
    debug!(%container, "generated container name");
    report.container = Some(container.clone());

    if !step(
        runner,
        interrupt,
        &create_command(cfg, &container),
        &Phase::Create,
        report,
    ) {
        eprintln!(
            "\nan error occurred during extraction: failed to create temporary container."
        );
        return;
    }
    println!(">>> created temporary container: {container}");
    let guard = ContainerGuard::new(runner, &container);

    // ── Extract ──────────────────────────────────────────────────────
    let mut all_copied = true;
    for artifact in &cfg.artifacts {
        let phase = Phase::Extract {
            dest: artifact.dest.clone(),
        };
        let cmd = copy_command(guard.name(), artifact);
        if !step(guard.runner(), interrupt, &cmd, &phase, report) {
            eprintln!(
                "\nan error occurred during extraction: failed to copy {}.",
                artifact.source
            );
            all_copied = false;
            break;
        }
    }

    if all_copied {
        println!("\n>>> build and extraction complete!");
        println!("binaries created: {}", report.extracted().join(", "));
    }

    // ── Cleanup ──────────────────────────────────────────────────────
    report.cleanup = guard.finish();
}

/// Run one phase's command and record the result. Refuses to start if the
/// run has been interrupted.
fn step(
    runner: &dyn CommandRunner,
    interrupt: &InterruptFlag,
    cmd: &ToolCommand,
    phase: &Phase,
    report: &mut RunReport,
) -> bool {
    if interrupt.is_raised() {
        debug!(%phase, "interrupted, not starting");
        eprintln!("error: interrupted before {phase}");
        report.set(phase, PhaseStatus::Failed("interrupted".into()));
        return false;
    }

    let outcome = runner.run(cmd);
    if outcome.is_success() {
        info!(%phase, "phase succeeded");
        report.set(phase, PhaseStatus::Succeeded);
        true
    } else {
        report.set(phase, PhaseStatus::Failed(outcome.summary(runner.program())));
        false
    }
}

/// Owns a created container and removes it exactly once: via
/// [`ContainerGuard::finish`] on normal paths, or on drop when unwinding.
pub struct ContainerGuard<'a> {
    runner: &'a dyn CommandRunner,
    name: String,
    armed: bool,
}

impl<'a> ContainerGuard<'a> {
    pub fn new(runner: &'a dyn CommandRunner, name: impl Into<String>) -> Self {
        Self {
            runner,
            name: name.into(),
            armed: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn runner(&self) -> &'a dyn CommandRunner {
        self.runner
    }

    /// Remove the container now and report how it went.
    pub fn finish(mut self) -> CleanupStatus {
        self.armed = false;
        remove_container(self.runner, &self.name)
    }
}

impl Drop for ContainerGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.armed = false;
            let _ = remove_container(self.runner, &self.name);
        }
    }
}

fn remove_container(runner: &dyn CommandRunner, name: &str) -> CleanupStatus {
    println!(">>> cleaning up container {name}...");
    if runner.run(&remove_command(name)).is_success() {
        println!("cleanup finished.");
        CleanupStatus::Removed
    } else {
        debug!(container = name, "container removal failed");
        eprintln!(
            "warning: failed to remove temporary container '{name}'. you may need to remove it manually."
        );
        CleanupStatus::Failed
    }
}
