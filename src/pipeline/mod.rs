pub mod commands;
pub mod orchestrator;
mod types;

pub use orchestrator::{ContainerGuard, run_extraction};
pub use types::{CleanupStatus, Phase, PhaseResult, PhaseStatus, RunReport};
