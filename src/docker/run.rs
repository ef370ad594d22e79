use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::{debug, trace};

use super::types::{ExecOutcome, ToolCommand};

/// Runs container-tool commands. The orchestrator only talks to the tool
/// through this trait.
pub trait CommandRunner {
    /// Program name every command is issued against.
    fn program(&self) -> &str;

    /// Run `cmd` to completion. Expected failures are reported through the
    /// returned outcome, never by panicking.
    fn run(&self, cmd: &ToolCommand) -> ExecOutcome;
}

/// [`CommandRunner`] backed by real child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    program: String,
    work_dir: PathBuf,
}

impl SystemRunner {
    pub fn new(program: impl Into<String>, work_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            work_dir: work_dir.as_ref().to_path_buf(),
        }
    }

    fn execute(&self, cmd: &ToolCommand) -> ExecOutcome {
        let mut command = Command::new(&self.program);
        command.args(&cmd.args).current_dir(&self.work_dir);

        let result: io::Result<(ExitStatus, String, String)> = if cmd.capture {
            command.output().map(|out| {
                (
                    out.status,
                    String::from_utf8_lossy(&out.stdout).into_owned(),
                    String::from_utf8_lossy(&out.stderr).into_owned(),
                )
            })
        } else {
            command
                .status()
                .map(|status| (status, String::new(), String::new()))
        };

        match result {
            Ok((status, _, stderr)) if status.success() => {
                trace!(%status, "command succeeded");
                if cmd.capture
                    && let Some(note) = stderr_note(&stderr)
                {
                    eprintln!("{note}");
                }
                ExecOutcome::Success
            }
            Ok((status, stdout, stderr)) => {
                debug!(%status, "command failed");
                ExecOutcome::Failed {
                    exit_code: status.code(),
                    stdout,
                    stderr,
                }
            }
            // `current_dir` failures surface as NotFound too.
            Err(_) if !self.work_dir.is_dir() => ExecOutcome::SpawnError(format!(
                "working directory {} does not exist",
                self.work_dir.display()
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => ExecOutcome::NotFound,
            Err(e) => ExecOutcome::SpawnError(e.to_string()),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, cmd: &ToolCommand) -> ExecOutcome {
        let line = command_line(&self.program, &cmd.args);
        println!(">>> running: {line}");
        debug!(work_dir = %self.work_dir.display(), capture = cmd.capture, "spawning");

        let outcome = self.execute(cmd);
        for msg in diagnostics(&self.program, &line, cmd.fatal, &outcome) {
            eprintln!("{msg}");
        }
        outcome
    }
}

/// Shell-quoted rendering of `program args...`, suitable for copy-paste.
pub fn command_line(program: &str, args: &[String]) -> String {
    shell_words::join(std::iter::once(program).chain(args.iter().map(String::as_str)))
}

/// Echo of stderr captured from a successful command, if it said anything.
pub fn stderr_note(stderr: &str) -> Option<String> {
    let stderr = stderr.trim();
    (!stderr.is_empty()).then(|| format!("stderr: {stderr}"))
}

/// Lines printed to stderr when a command does not succeed.
pub fn diagnostics(program: &str, line: &str, fatal: bool, outcome: &ExecOutcome) -> Vec<String> {
    let level = if fatal { "error" } else { "warning" };
    let mut out = Vec::new();

    match outcome {
        ExecOutcome::Success => {}
        ExecOutcome::Failed {
            exit_code,
            stdout,
            stderr,
        } => {
            match exit_code {
                Some(code) => out.push(format!("{level}: command failed with exit code {code}")),
                None => out.push(format!("{level}: command terminated by signal")),
            }
            out.push(format!("command: {line}"));
            if !stdout.trim().is_empty() {
                out.push(format!("stdout:\n{}", stdout.trim()));
            }
            if !stderr.trim().is_empty() {
                out.push(format!("stderr:\n{}", stderr.trim()));
            }
        }
        ExecOutcome::NotFound => out.push(format!(
            "{level}: command not found: '{program}'. is {program} installed and in your system's path?"
        )),
        ExecOutcome::SpawnError(e) => {
            out.push(format!(
                "{level}: an unexpected error occurred running command: {line}"
            ));
            out.push(e.clone());
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_quotes_awkward_arguments() {
        let args = vec!["cp".to_string(), "c:/usr/local/bin/my app".to_string()];
        let line = command_line("docker", &args);
        assert!(line.starts_with("docker cp "));
        assert_eq!(
            shell_words::split(&line).unwrap(),
            ["docker", "cp", "c:/usr/local/bin/my app"]
        );
    }

    #[test]
    fn diagnostics_empty_on_success() {
        assert!(diagnostics("docker", "docker build .", true, &ExecOutcome::Success).is_empty());
    }

    #[test]
    fn diagnostics_include_exit_code_command_and_output() {
        let outcome = ExecOutcome::Failed {
            exit_code: Some(1),
            stdout: "partial\n".into(),
            stderr: "no such image\n".into(),
        };
        let lines = diagnostics("docker", "docker create x", true, &outcome);
        assert_eq!(lines[0], "error: command failed with exit code 1");
        assert_eq!(lines[1], "command: docker create x");
        assert_eq!(lines[2], "stdout:\npartial");
        assert_eq!(lines[3], "stderr:\nno such image");
    }

    #[test]
    fn diagnostics_downgrade_non_fatal_to_warning() {
        let outcome = ExecOutcome::Failed {
            exit_code: Some(1),
            stdout: String::new(),
            stderr: String::new(),
        };
        let lines = diagnostics("docker", "docker rm x", false, &outcome);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("warning:"));
    }

    #[test]
    fn diagnostics_name_missing_tool() {
        let lines = diagnostics("podman", "podman build .", true, &ExecOutcome::NotFound);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("command not found: 'podman'"));
        assert!(lines[0].contains("is podman installed"));
    }

    #[test]
    fn stderr_note_skips_blank_output() {
        assert_eq!(stderr_note("  \n"), None);
        assert_eq!(
            stderr_note("pulling layer\n").as_deref(),
            Some("stderr: pulling layer")
        );
    }

    #[test]
    fn missing_work_dir_is_not_blamed_on_the_tool() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("gone");
        let runner = SystemRunner::new("sh", &gone);
        match runner.run(&ToolCommand::new(["-c", "true"])) {
            ExecOutcome::SpawnError(msg) => {
                assert!(msg.contains("working directory"), "msg: {msg}");
                assert!(msg.contains("gone"), "msg: {msg}");
            }
            other => panic!("expected SpawnError, got: {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_reported_as_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new("binextract-definitely-not-installed", dir.path());
        let outcome = runner.run(&ToolCommand::new(["build", "."]));
        assert_eq!(outcome, ExecOutcome::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn zero_exit_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new("true", dir.path());
        assert!(runner.run(&ToolCommand::new(Vec::<String>::new())).is_success());
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new("sh", dir.path());
        let cmd = ToolCommand::new(["-c", "echo out; echo err >&2; exit 3"]).captured();
        match runner.run(&cmd) {
            ExecOutcome::Failed {
                exit_code,
                stdout,
                stderr,
            } => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(stdout.trim(), "out");
                assert_eq!(stderr.trim(), "err");
            }
            other => panic!("expected Failed, got: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn captured_stderr_does_not_fail_a_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new("sh", dir.path());
        let cmd = ToolCommand::new(["-c", "echo warn >&2"]).captured();
        assert_eq!(runner.run(&cmd), ExecOutcome::Success);
    }

    #[cfg(unix)]
    #[test]
    fn commands_run_in_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let runner = SystemRunner::new("sh", dir.path());
        let cmd = ToolCommand::new(["-c", "touch marker"]).captured();
        assert!(runner.run(&cmd).is_success());
        assert!(dir.path().join("marker").exists());
    }
}
