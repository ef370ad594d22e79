use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set when the user asks the run to stop (SIGINT/SIGTERM).
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the run as interrupted. Idempotent.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One invocation of the container tool. `args` excludes the program
/// name, which the runner owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub args: Vec<String>,
    /// Capture stdout/stderr instead of inheriting the terminal.
    pub capture: bool,
    /// Whether the caller treats failure as fatal. Non-fatal failures are
    /// reported as warnings.
    pub fatal: bool,
}

impl ToolCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            capture: false,
            fatal: true,
        }
    }

    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    pub fn non_fatal(mut self) -> Self {
        self.fatal = false;
        self
    }

    /// The verb (`build`, `cp`, ...), if any.
    pub fn verb(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }
}

/// Result of running a [`ToolCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecOutcome {
    Success,
    /// The program ran and exited unsuccessfully. `exit_code` is `None`
    /// when it was terminated by a signal. Output is empty unless captured.
    Failed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The program could not be found on the host.
    NotFound,
    /// Any other failure to start the process.
    SpawnError(String),
}

impl ExecOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecOutcome::Success)
    }

    /// Short one-line description, used in run reports.
    pub fn summary(&self, program: &str) -> String {
        match self {
            ExecOutcome::Success => "succeeded".to_string(),
            ExecOutcome::Failed {
                exit_code: Some(code),
                ..
            } => format!("exited with code {code}"),
            ExecOutcome::Failed {
                exit_code: None, ..
            } => "terminated by signal".to_string(),
            ExecOutcome::NotFound => format!("`{program}` not found"),
            ExecOutcome::SpawnError(e) => format!("failed to start: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_flag_starts_lowered() {
        let flag = InterruptFlag::new();
        assert!(!flag.is_raised());
    }

    #[test]
    fn interrupt_flag_is_visible_across_clones() {
        let a = InterruptFlag::new();
        let b = a.clone();
        a.raise();
        assert!(b.is_raised());
        // Idempotent.
        a.raise();
        assert!(b.is_raised());
    }

    #[test]
    fn tool_command_defaults_to_live_fatal() {
        let cmd = ToolCommand::new(["build", "."]);
        assert_eq!(cmd.args, vec!["build".to_string(), ".".to_string()]);
        assert!(!cmd.capture);
        assert!(cmd.fatal);
        assert_eq!(cmd.verb(), Some("build"));
    }

    #[test]
    fn tool_command_builders() {
        let cmd = ToolCommand::new(["rm", "x"]).captured().non_fatal();
        assert!(cmd.capture);
        assert!(!cmd.fatal);
    }

    #[test]
    fn outcome_summaries() {
        let failed = ExecOutcome::Failed {
            exit_code: Some(125),
            stdout: String::new(),
            stderr: "boom".into(),
        };
        assert!(!failed.is_success());
        assert_eq!(failed.summary("docker"), "exited with code 125");

        let killed = ExecOutcome::Failed {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert_eq!(killed.summary("docker"), "terminated by signal");
        assert_eq!(ExecOutcome::NotFound.summary("podman"), "`podman` not found");
        assert!(ExecOutcome::Success.is_success());
    }
}
