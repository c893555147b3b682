//! External command execution.

use crate::error::{DevInitError, Result};
use std::io::Write;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// A fully spelled-out external command.
///
/// Package managers and authenticators describe what they want to run as a
/// list of invocations; [`execute`] is the only place that spawns processes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run (looked up on PATH).
    pub program: String,
    /// Arguments passed verbatim.
    pub args: Vec<String>,
}

impl Invocation {
    /// Create an invocation of `program` with `args`.
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Run `script` through `sh -c`. Used for the few pipelines
    /// (`curl ... | sh`) that vendors document as the install path.
    pub fn shell(script: &str) -> Self {
        Self::new("sh", ["-c", script])
    }

    /// Prefix with `sudo` unless the process is already privileged.
    pub fn privileged(self, elevated: bool) -> Self {
        if elevated {
            return self;
        }
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
        }
    }

    /// Human-readable command line, used in logs and remediation hints.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        for arg in &self.args {
            if arg.contains(' ') {
                parts.push(format!("'{}'", arg));
            } else {
                parts.push(arg.clone());
            }
        }
        parts.join(" ")
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Capture stdout (if false, inherits from parent).
    pub capture_stdout: bool,

    /// Capture stderr (if false, inherits from parent).
    pub capture_stderr: bool,

    /// Data written to the child's stdin. When `None` stdin is inherited so
    /// sign-in flows and `sudo` can talk to the user.
    pub stdin: Option<String>,
}

/// Execute an invocation and wait for it.
///
/// A command that cannot be spawned at all is an error; a command that runs
/// and exits non-zero is a `CommandResult` with `success == false`.
pub fn execute(invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("Running: {}", invocation.display());

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if options.stdin.is_some() {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::inherit());
    }

    if options.capture_stdout {
        cmd.stdout(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
    }

    if options.capture_stderr {
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stderr(Stdio::inherit());
    }

    let spawn_failed = |_| DevInitError::CommandFailed {
        command: invocation.display(),
        code: None,
    };

    let mut child = cmd.spawn().map_err(spawn_failed)?;

    if let Some(input) = &options.stdin {
        if let Some(mut pipe) = child.stdin.take() {
            pipe.write_all(input.as_bytes())?;
        }
    }

    let output = child.wait_with_output().map_err(spawn_failed)?;
    let duration = start.elapsed();

    let stdout = if options.capture_stdout {
        String::from_utf8_lossy(&output.stdout).to_string()
    } else {
        String::new()
    };

    let stderr = if options.capture_stderr {
        String::from_utf8_lossy(&output.stderr).to_string()
    } else {
        String::new()
    };

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Execute a command and collect output without showing it.
pub fn execute_quiet(invocation: &Invocation) -> Result<CommandResult> {
    let options = CommandOptions {
        capture_stdout: true,
        capture_stderr: true,
        ..Default::default()
    };
    execute(invocation, &options)
}

/// Run each invocation in order, stopping at the first failure.
///
/// Output is streamed to the terminal so package managers can show their
/// own progress and `sudo` can ask for a password.
pub fn execute_all(invocations: &[Invocation]) -> Result<()> {
    for invocation in invocations {
        let result = execute(invocation, &CommandOptions::default())?;
        if !result.success {
            return Err(DevInitError::CommandFailed {
                command: invocation.display(),
                code: result.exit_code,
            });
        }
    }
    Ok(())
}
