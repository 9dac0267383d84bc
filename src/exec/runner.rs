//! Blocking subprocess runner

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{PkgDevError, Result};
use crate::exec::command::{StdioMode, ToolCommand};

/// Output collected from a finished command. Both streams are empty in inherit mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn from_stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// stdout followed by stderr, for diagnostics.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// Runs external commands to completion.
///
/// A non-zero exit status is reported as [`PkgDevError::ToolFailed`], carrying whatever output
/// was captured, so callers only see `Ok` for successful invocations.
pub trait ToolRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

/// Runner backed by `std::process::Command`.
///
/// In verbose mode the stderr of captured commands goes straight to the terminal instead of
/// being held back for error reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner {
    verbose: bool,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl ToolRunner for SystemRunner {
    fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let command_line = command.command_line();
        debug!(command = %command_line, cwd = ?command.cwd, "Executing");

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(ref dir) = command.cwd {
            cmd.current_dir(dir);
        }

        cmd.stdin(if command.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::inherit()
        });
        if command.stdio == StdioMode::Capture {
            cmd.stdout(Stdio::piped());
            cmd.stderr(if self.verbose {
                Stdio::inherit()
            } else {
                Stdio::piped()
            });
        }

        let mut child = cmd.spawn().map_err(|source| PkgDevError::SpawnError {
            program: command.program.clone(),
            source,
        })?;

        if let Some(ref input) = command.stdin {
            // Dropping the handle closes the pipe so the child sees EOF. A child that exits
            // without reading its input breaks the pipe; its exit status is what gets reported.
            if let Some(mut stdin) = child.stdin.take() {
                match stdin.write_all(input.as_bytes()) {
                    Ok(()) => {}
                    Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                        debug!(command = %command_line, "Child closed stdin early");
                    }
                    Err(e) => {
                        drop(stdin);
                        let _ = child.wait();
                        return Err(e.into());
                    }
                }
            }
        }

        let output = child.wait_with_output()?;
        let collected = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !output.status.success() {
            return Err(PkgDevError::ToolFailed {
                command: command_line,
                code: output.status.code(),
                output: collected.combined(),
            });
        }

        Ok(collected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_stdout() {
        let cmd = ToolCommand::new("sh").args(["-c", "echo hello"]).capture();
        let output = SystemRunner::new().run(&cmd).unwrap();
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[test]
    fn test_stdin_is_fed_and_closed() {
        let cmd = ToolCommand::new("cat").stdin("pytest==4.6\n").capture();
        let output = SystemRunner::new().run(&cmd).unwrap();
        assert_eq!(output.stdout, "pytest==4.6\n");
    }

    #[test]
    fn test_non_zero_exit_is_tool_failure() {
        let cmd = ToolCommand::new("sh")
            .args(["-c", "echo broken >&2; exit 3"])
            .capture();
        match SystemRunner::new().run(&cmd) {
            Err(PkgDevError::ToolFailed { code, output, .. }) => {
                assert_eq!(code, Some(3));
                assert!(output.contains("broken"));
            }
            other => panic!("expected ToolFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_child_exiting_before_reading_stdin_reports_its_status() {
        let cmd = ToolCommand::new("sh")
            .args(["-c", "echo setup failed >&2; exit 3"])
            .stdin("x".repeat(4 << 20))
            .capture();
        let err = SystemRunner::new().run(&cmd).unwrap_err();
        match err {
            PkgDevError::ToolFailed {
                code, ref output, ..
            } => {
                assert_eq!(code, Some(3));
                assert!(output.contains("setup failed"));
            }
            ref other => panic!("expected ToolFailed, got {:?}", other),
        }
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_verbose_runner_passes_stderr_through() {
        let cmd = ToolCommand::new("sh")
            .args(["-c", "echo out; echo noise >&2"])
            .capture();

        let quiet = SystemRunner::new().run(&cmd).unwrap();
        assert_eq!(quiet.stderr.trim(), "noise");

        let verbose = SystemRunner::new().verbose(true).run(&cmd).unwrap();
        assert_eq!(verbose.stdout.trim(), "out");
        assert!(verbose.stderr.is_empty());
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let cmd = ToolCommand::new("pkgdev-no-such-program-12345");
        let err = SystemRunner::new().run(&cmd).unwrap_err();
        assert!(matches!(err, PkgDevError::SpawnError { .. }));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_current_dir_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ToolCommand::new("pwd").current_dir(dir.path()).capture();
        let output = SystemRunner::new().run(&cmd).unwrap();
        let reported = std::fs::canonicalize(output.stdout.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_combined_output() {
        let out = ToolOutput {
            stdout: "a\n".into(),
            stderr: "b".into(),
        };
        assert_eq!(out.combined(), "a\nb");
        assert_eq!(ToolOutput::from_stdout("x").combined(), "x");
    }
}
