//! Failure reporting for external commands.
//!
//! [`CommandFailed`] carries everything a finished command left behind —
//! argument vector, exit status, captured streams — and renders a
//! human-readable message with the stream tails truncated to a readable
//! length. [`checked_output`] runs a [`Command`] and converts a non-success
//! exit into that error.

use std::fmt;
use std::io;
use std::process::{Command, Output};

use thiserror::Error;

/// Longest stream tail reproduced in a failure message, in bytes.
const STREAM_TAIL_LIMIT: usize = 2048;

/// Errors from running an external command.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProcessError {
    /// The command could not be launched at all.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        /// Program that failed to launch.
        program: String,
        /// Underlying launch failure.
        #[source]
        source: io::Error,
    },

    /// The command ran and exited unsuccessfully.
    #[error(transparent)]
    Failed(#[from] Box<CommandFailed>),
}

/// A finished command that exited unsuccessfully.
///
/// The display form names the full command line and exit status, then
/// reproduces the tail of each captured stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandFailed {
    program: String,
    args: Vec<String>,
    code: Option<i32>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl CommandFailed {
    /// Wrap a finished command's results.
    ///
    /// `code` is `None` when the command was terminated by a signal rather
    /// than exiting.
    #[must_use]
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        code: Option<i32>,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            code,
            stdout,
            stderr,
        }
    }

    /// Wrap the captured [`Output`] of a finished command.
    #[must_use]
    pub fn from_output(program: impl Into<String>, args: Vec<String>, output: Output) -> Self {
        Self::new(
            program,
            args,
            output.status.code(),
            output.stdout,
            output.stderr,
        )
    }

    /// The program that was run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The arguments the program was run with.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The exit code, or `None` when the command died to a signal.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        self.code
    }

    /// Captured standard output.
    #[must_use]
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    /// Captured standard error.
    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for CommandFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "command '{}' ", self.command_line())?;
        match self.code {
            Some(code) => write!(f, "exited with status {code}")?,
            None => write!(f, "was terminated by a signal")?,
        }
        write_stream(f, "stdout", &self.stdout)?;
        write_stream(f, "stderr", &self.stderr)
    }
}

impl std::error::Error for CommandFailed {}

/// Run `command`, capturing its output, and fail unless it exits
/// successfully.
///
/// # Errors
///
/// - [`ProcessError::Spawn`] when the command cannot be launched.
/// - [`ProcessError::Failed`] when it runs but exits with a non-success
///   status; the error carries the argument vector, exit code, and both
///   captured streams.
pub fn checked_output(command: &mut Command) -> Result<Output, ProcessError> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command.output().map_err(|source| ProcessError::Spawn {
        program: program.clone(),
        source,
    })?;
    if output.status.success() {
        return Ok(output);
    }
    tracing::debug!(
        program = %program,
        code = ?output.status.code(),
        "command exited unsuccessfully"
    );
    let args = command
        .get_args()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect();
    Err(Box::new(CommandFailed::from_output(program, args, output)).into())
}

fn write_stream(f: &mut fmt::Formatter<'_>, name: &str, stream: &[u8]) -> fmt::Result {
    if stream.is_empty() {
        return write!(f, "\n{name}: (empty)");
    }
    write!(f, "\n{name}:")?;
    for line in tail(stream).lines() {
        write!(f, "\n  {line}")?;
    }
    Ok(())
}

/// Render the last [`STREAM_TAIL_LIMIT`] bytes of `stream`, marking any
/// elision.
fn tail(stream: &[u8]) -> String {
    let text = String::from_utf8_lossy(stream);
    let text = text.trim_end();
    if text.len() <= STREAM_TAIL_LIMIT {
        return text.to_owned();
    }
    let mut start = text.len() - STREAM_TAIL_LIMIT;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    let kept = text.get(start..).unwrap_or_default();
    format!("... ({start} bytes omitted)\n{kept}")
}
