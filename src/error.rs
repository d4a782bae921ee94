use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

use thiserror::Error;

/// Positional operands a verb can be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Executable for `run`.
    Path,
    /// File to move from.
    SourcePath,
    /// File to move to.
    TargetPath,
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Path => "PATH",
            Self::SourcePath => "SOURCE-PATH",
            Self::TargetPath => "TARGET-PATH",
        })
    }
}

/// Errors that end an invocation.
///
/// Every variant is terminal and maps to exit code 1. `Display` yields the text shown
/// after the `*** ERROR: ` prefix.
#[derive(Debug, Error)]
pub enum ShellError {
    /// No verb was given
    #[error("Command expected")]
    CommandExpected,

    /// The first argument is not one of the known verbs
    #[error("Unexpected command: {0}")]
    UnexpectedCommand(String),

    /// A required operand is absent
    #[error("Missing {0} argument.")]
    MissingArgument(Operand),

    /// The process image could not be replaced
    #[error("Run failed.")]
    RunFailed(#[source] io::Error),

    /// A read failed or a write transferred fewer bytes than requested
    #[error("Copy failed.")]
    CopyFailed(#[source] io::Error),

    /// The file to move could not be opened for reading
    #[error("Cannot open SOURCE-PATH: {}", .path.display())]
    OpenSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination could not be created or truncated
    #[error("Cannot open TARGET-PATH: {}", .path.display())]
    OpenTarget {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    /// Write the error as `*** ERROR: <message>` followed by a blank line.
    pub fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(out, "*** ERROR: {self}\n\n")
    }
}
