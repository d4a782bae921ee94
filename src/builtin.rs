use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Streams};
use crate::env::Environment;
use crate::error::{Operand, ShellError};
use crate::interpreter::Factory;
use anyhow::Result;
use log::{debug, warn};
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Help and usage text, printed verbatim.
pub const USAGE: &str = "\n\
nanoshell: An extremely lightweight shell used for working with\n\
scratch Docker container images\n\
\n\
LIMITATIONS:\n\
\n\
PATH or other environment variables are not recognized so you'll need to use\n\
absolute directory and file references.\n\
\n\
Single and double quoted strings are not currently supported.\n\
\n\
File pipe, redirection and other operators are not supported.\n\
\n\
Double and single quotes are not supported nor is character escaping.\n\
\n\
COMMANDS:\n\
\n\
------------------------------------------------------------\n\
help\n\
\n\
Prints help.\n\
\n\
------------------------------------------------------------\n\
run PATH SPACE-SEPARATED-ARGS\n\
\n\
Runs the binary at PATH, passing any arguments passed\n\
\n\
------------------------------------------------------------\n\
mv SOURCE-PATH TARGET-PATH\n\
\n\
Moves a single file from SOURCE-PATH to TARGET-PATH.\n\
Wildcards are not supported\n\
\n";

/// Size of the chunk buffer used by [`stream_copy`].
pub const COPY_BUFFER_SIZE: usize = 8096;

/// Verbs executed in-process, without replacing or spawning anything.
pub(crate) trait BuiltinCommand: Sized {
    /// Verb that selects the command, e.g. "mv".
    fn name() -> &'static str;

    /// Validate the operands following the verb.
    fn from_args(args: &[OsString]) -> Result<Self, ShellError>;

    /// Return value follows shell conventions: 0 for success, non-zero for error.
    fn execute(self, io: &mut Streams<'_>, env: &Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, io: &mut Streams<'_>, env: &Environment) -> Result<ExitCode> {
        <T as BuiltinCommand>::execute(*self, io, env)
    }
}

/// Operands were rejected before the verb could run.
pub(crate) struct InvalidArgs(pub(crate) ShellError);

impl ExecutableCommand for InvalidArgs {
    fn execute(self: Box<Self>, _io: &mut Streams<'_>, _env: &Environment) -> Result<ExitCode> {
        Err(self.0.into())
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &OsStr,
        args: &[OsString],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == OsStr::new(T::name()) {
            Some(match T::from_args(args) {
                Ok(cmd) => Box::new(cmd),
                Err(err) => Box::new(InvalidArgs(err)),
            })
        } else {
            None
        }
    }
}

/// Print the usage text to standard output. Operands are ignored.
pub struct Help;

impl BuiltinCommand for Help {
    fn name() -> &'static str {
        "help"
    }

    fn from_args(_args: &[OsString]) -> Result<Self, ShellError> {
        Ok(Help)
    }

    fn execute(self, io: &mut Streams<'_>, _env: &Environment) -> Result<ExitCode> {
        io.stdout.write_all(USAGE.as_bytes())?;
        Ok(0)
    }
}

/// Move a single file by copying it and then removing the source.
#[derive(Debug)]
pub struct Mv {
    pub source: PathBuf,
    pub target: PathBuf,
}

impl BuiltinCommand for Mv {
    fn name() -> &'static str {
        "mv"
    }

    fn from_args(args: &[OsString]) -> Result<Self, ShellError> {
        match args {
            [] => Err(ShellError::MissingArgument(Operand::SourcePath)),
            [_] => Err(ShellError::MissingArgument(Operand::TargetPath)),
            [source, target, ..] => Ok(Mv {
                source: PathBuf::from(source),
                target: PathBuf::from(target),
            }),
        }
    }

    fn execute(self, _io: &mut Streams<'_>, _env: &Environment) -> Result<ExitCode> {
        let copied = move_file(&self.source, &self.target)?;
        debug!(
            "moved {} bytes from {} to {}",
            copied,
            self.source.display(),
            self.target.display()
        );
        Ok(0)
    }
}

/// Copy `source` into `target` (created or truncated), then remove `source`.
///
/// The source is opened and checked to be a regular file first, so a missing or
/// unreadable source never creates or truncates the target. The source is removed only after every byte was written; a failed removal is logged
/// and otherwise ignored. Both files are closed before the removal.
///
/// Returns the number of bytes copied.
pub fn move_file(source: &Path, target: &Path) -> Result<u64, ShellError> {
    let copied = {
        let open_source = |err| ShellError::OpenSource {
            path: source.to_owned(),
            source: err,
        };
        let mut reader = File::open(source).map_err(open_source)?;
        if !reader.metadata().map_err(open_source)?.is_file() {
            return Err(open_source(io::Error::new(
                ErrorKind::IsADirectory,
                "not a regular file",
            )));
        }
        let mut writer = File::create(target).map_err(|err| ShellError::OpenTarget {
            path: target.to_owned(),
            source: err,
        })?;
        stream_copy(&mut reader, &mut writer)?
    };

    if let Err(err) = fs::remove_file(source) {
        warn!("copied but could not remove {}: {}", source.display(), err);
    }
    Ok(copied)
}

/// Stream `reader` into `writer` through a [`COPY_BUFFER_SIZE`] chunk buffer.
///
/// Each chunk is handed to a single `write` call. A write that accepts fewer bytes
/// than the chunk holds is fatal, as is any read or write error other than an
/// interrupted call.
pub fn stream_copy<R, W>(reader: &mut R, writer: &mut W) -> Result<u64, ShellError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = [0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let cb = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(cb) => cb,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(ShellError::CopyFailed(err)),
        };

        let written = loop {
            match writer.write(&buffer[..cb]) {
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                other => break other,
            }
        };
        match written {
            Ok(n) if n == cb => total += cb as u64,
            Ok(n) => {
                return Err(ShellError::CopyFailed(io::Error::new(
                    ErrorKind::WriteZero,
                    format!("short write: {n} of {cb} bytes"),
                )));
            }
            Err(err) => return Err(ShellError::CopyFailed(err)),
        }
    }

    writer.flush().map_err(ShellError::CopyFailed)?;
    Ok(total)
}
