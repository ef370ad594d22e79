use std::fmt;

use crate::config::Config;

/// Identifies a step of the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Precondition,
    Build,
    Create,
    Extract { dest: String },
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Precondition => f.write_str("precondition check"),
            Phase::Build => f.write_str("image build"),
            Phase::Create => f.write_str("container creation"),
            Phase::Extract { dest } => write!(f, "extraction of {dest}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseStatus {
    Succeeded,
    Failed(String),
    /// Not attempted because an earlier phase failed.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStatus {
    /// No container was created.
    NotNeeded,
    Removed,
    /// Removal was attempted and failed. Never affects the verdict.
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseResult {
    pub phase: Phase,
    pub status: PhaseStatus,
}

/// Outcome of one run, phase by phase.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Generated container name, once the run got that far.
    pub container: Option<String>,
    pub phases: Vec<PhaseResult>,
    pub cleanup: CleanupStatus,
}

impl RunReport {
    /// Every phase the config implies, all `Skipped`.
    pub fn pending(cfg: &Config) -> Self {
        let mut phases = vec![Phase::Precondition, Phase::Build, Phase::Create];
        phases.extend(cfg.artifacts.iter().map(|a| Phase::Extract {
            dest: a.dest.clone(),
        }));
        Self {
            container: None,
            phases: phases
                .into_iter()
                .map(|phase| PhaseResult {
                    phase,
                    status: PhaseStatus::Skipped,
                })
                .collect(),
            cleanup: CleanupStatus::NotNeeded,
        }
    }

    pub fn set(&mut self, phase: &Phase, status: PhaseStatus) {
        if let Some(result) = self.phases.iter_mut().find(|r| &r.phase == phase) {
            result.status = status;
        }
    }

    pub fn status(&self, phase: &Phase) -> Option<&PhaseStatus> {
        self.phases
            .iter()
            .find(|r| &r.phase == phase)
            .map(|r| &r.status)
    }

    pub fn succeeded(&self) -> bool {
        self.phases
            .iter()
            .all(|r| r.status == PhaseStatus::Succeeded)
    }

    /// First phase that failed, with its diagnostic.
    pub fn failure(&self) -> Option<(&Phase, &str)> {
        self.phases.iter().find_map(|r| match &r.status {
            PhaseStatus::Failed(msg) => Some((&r.phase, msg.as_str())),
            _ => None,
        })
    }

    /// Host paths that were written.
    pub fn extracted(&self) -> Vec<&str> {
        self.phases
            .iter()
            .filter_map(|r| match (&r.phase, &r.status) {
                (Phase::Extract { dest }, PhaseStatus::Succeeded) => Some(dest.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Process exit status: 0 on success, 1 otherwise. Cleanup is ignored.
    pub fn exit_code(&self) -> u8 {
        if self.succeeded() { 0 } else { 1 }
    }
}
