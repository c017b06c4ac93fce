//! Command execution seam.
//!
//! Probes never call `std::process::Command` directly; they go through a
//! [`CommandRunner`] so tests can substitute scripted output.

use std::process::Command;

use crate::error::ProbeError;

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a nonzero exit into [`ProbeError::CommandFailed`].
    pub fn into_result(self, program: &str) -> Result<Self, ProbeError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ProbeError::CommandFailed {
                program: program.to_string(),
                code: self.code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Runs an external program to completion and captures its output.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ProbeError>;
}

/// Runs commands on the host with `std::process::Command`.
///
/// Blocks until the child exits. There is no timeout: a hung tool hangs the
/// caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, ProbeError> {
        tracing::debug!(program, ?args, "running command");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| ProbeError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_zero_exit() {
        let ok = CommandOutput {
            code: Some(0),
            ..Default::default()
        };
        let failed = CommandOutput {
            code: Some(2),
            ..Default::default()
        };
        let signalled = CommandOutput::default();
        assert!(ok.success());
        assert!(!failed.success());
        assert!(!signalled.success());
    }

    #[test]
    fn into_result_carries_stderr() {
        let out = CommandOutput {
            code: Some(10),
            stdout: String::new(),
            stderr: "Error: unknown connection\n".into(),
        };
        match out.into_result("nmcli") {
            Err(ProbeError::CommandFailed {
                program,
                code,
                stderr,
            }) => {
                assert_eq!(program, "nmcli");
                assert_eq!(code, Some(10));
                assert_eq!(stderr, "Error: unknown connection");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn system_runner_reports_missing_program() {
        let err = SystemRunner
            .run("fieldcheck-definitely-not-installed", &[])
            .unwrap_err();
        assert!(matches!(err, ProbeError::Spawn { .. }));
    }
}
