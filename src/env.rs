use std::ffi::OsString;

/// Environment variable holding the `env_logger` filter, e.g. `NANOSHELL_LOG=debug`.
///
/// Logging is off unless this is set so that nothing but the documented messages
/// ever reaches standard error.
pub const LOG_ENV: &str = "NANOSHELL_LOG";

/// Filter used when [`LOG_ENV`] is unset.
pub const DEFAULT_LOG_FILTER: &str = "off";

/// Invocation-scoped view of the process the shell runs in.
///
/// Captured once at startup and never mutated. Nothing else from the process
/// environment is consulted; in particular `PATH` is never read.
#[derive(Debug, Clone)]
pub struct Environment {
    program: OsString,
}

impl Environment {
    /// Create an environment for a shell invoked as `program` (its own argv[0]).
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Capture argv[0] of the current process.
    ///
    /// Falls back to the package name when the process was started with an empty
    /// argument vector.
    pub fn from_process() -> Self {
        let program = std::env::args_os()
            .next()
            .unwrap_or_else(|| OsString::from(env!("CARGO_PKG_NAME")));
        Self::new(program)
    }

    /// The name the shell itself was invoked as.
    pub fn program(&self) -> &OsString {
        &self.program
    }

    /// Build the argument vector handed to a replaced process.
    ///
    /// Slot 0 is the shell's own argv[0], not the path of the target executable,
    /// followed by `args` in order.
    pub fn forwarded_argv(&self, args: &[OsString]) -> Vec<OsString> {
        std::iter::once(self.program.clone())
            .chain(args.iter().cloned())
            .collect()
    }
}
