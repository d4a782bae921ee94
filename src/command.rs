use crate::env::Environment;
use anyhow::Result;
use std::ffi::{OsStr, OsString};
use std::io::Write;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Exit code reported for every failure detected by the shell itself.
pub const FAILURE: ExitCode = 1;

/// Output streams a command writes to.
///
/// The binary hands in locked standard output and standard error; tests hand in
/// plain byte buffers.
pub struct Streams<'a> {
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl<'a> Streams<'a> {
    pub fn new(stdout: &'a mut dyn Write, stderr: &'a mut dyn Write) -> Self {
        Self { stdout, stderr }
    }

    /// Flush both streams, e.g. before the process image goes away.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.stdout.flush()?;
        self.stderr.flush()
    }
}

/// Object-safe trait for any verb the shell can execute.
///
/// Errors that are a [`ShellError`](crate::ShellError) are rendered by the
/// [`Interpreter`](crate::Interpreter) as `*** ERROR:` messages; any other error
/// (such as a failed write to standard output) is passed up to the caller.
pub trait ExecutableCommand {
    fn execute(self: Box<Self>, io: &mut Streams<'_>, env: &Environment) -> Result<ExitCode>;
}

/// Factory that tries to create a command from a verb and its operands.
///
/// Returns `None` when the factory doesn't recognize `name`.
pub trait CommandFactory {
    fn try_create(
        &self,
        env: &Environment,
        name: &OsStr,
        args: &[OsString],
    ) -> Option<Box<dyn ExecutableCommand>>;
}
