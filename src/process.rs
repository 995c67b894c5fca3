//! External utility invocation
//!
//! Every OS utility rebundle depends on (`sudo`, `mv`, `xattr`, `codesign`) goes through
//! [`CommandRunner`]. Only the exit status is inspected; stdio is inherited so that the
//! elevation prompt reaches the operator.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// A single program invocation with a fixed argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Program name without its directory, e.g. `codesign`
    pub fn program_name(&self) -> String {
        self.program.file_name().map_or_else(
            || self.program.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", Path::new(arg).display())?;
        }
        Ok(())
    }
}

/// Why an invocation did not succeed
#[derive(Error, Debug)]
pub enum ProcessFailure {
    #[error("{program} could not be started: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {}", describe_code(.code))]
    Exit { program: String, code: Option<i32> },
}

#[allow(clippy::ref_option)]
fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown (terminated by signal)".to_string(), |c| c.to_string())
}

/// Runs external utilities and reports success or failure
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ProcessFailure>;
}

/// Runs invocations with `std::process::Command`, blocking until exit
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<(), ProcessFailure> {
        debug!(command = %invocation, "running external utility");

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .map_err(|source| ProcessFailure::Spawn {
                program: invocation.program_name(),
                source,
            })?;

        debug!(command = %invocation, code = ?status.code(), "external utility finished");

        if status.success() {
            Ok(())
        } else {
            Err(ProcessFailure::Exit {
                program: invocation.program_name(),
                code: status.code(),
            })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_display() {
        let inv = Invocation::new("/usr/bin/codesign")
            .arg("--force")
            .arg("--sign")
            .arg("-")
            .arg("/Users/x/App.app");
        assert_eq!(
            inv.to_string(),
            "/usr/bin/codesign --force --sign - /Users/x/App.app"
        );
        assert_eq!(inv.program_name(), "codesign");
    }

    #[test]
    fn test_system_runner_success() {
        let result = SystemRunner.run(&Invocation::new("true"));
        assert!(result.is_ok());
    }

    #[test]
    fn test_system_runner_nonzero_exit() {
        let result = SystemRunner.run(&Invocation::new("false"));
        match result {
            Err(ProcessFailure::Exit { program, code }) => {
                assert_eq!(program, "false");
                assert_eq!(code, Some(1));
            }
            other => panic!("Expected exit failure, got {other:?}"),
        }
    }

    #[test]
    fn test_system_runner_missing_program() {
        let result = SystemRunner.run(&Invocation::new("/nonexistent/rebundle-tool"));
        assert!(matches!(result, Err(ProcessFailure::Spawn { .. })));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("could not be started"));
    }

    #[test]
    fn test_exit_failure_message() {
        let failure = ProcessFailure::Exit {
            program: "codesign".to_string(),
            code: Some(1),
        };
        assert_eq!(failure.to_string(), "codesign exited with status 1");
    }
}
