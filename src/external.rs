use crate::builtin::InvalidArgs;
use crate::command::{CommandFactory, ExecutableCommand, ExitCode, Streams};
use crate::env::Environment;
use crate::error::{Operand, ShellError};
use anyhow::Result;
use log::debug;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use std::process::ExitStatus;

/// Capability to hand the current process over to another executable.
pub trait ProcessReplacer {
    /// Replace the current process with the executable at `path`, passing `argv`
    /// (slot 0 included) as its argument vector.
    ///
    /// Only returns when the replacement could not happen; the returned error tells
    /// why. `path` is used exactly as given, without any search path.
    fn replace(&self, path: &OsStr, argv: &[OsString]) -> io::Error;
}

/// Replaces the process image in place with `execv`.
#[cfg(unix)]
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecReplacer;

#[cfg(unix)]
impl ProcessReplacer for ExecReplacer {
    fn replace(&self, path: &OsStr, argv: &[OsString]) -> io::Error {
        use nix::unistd::execv;
        use std::ffi::CString;
        use std::os::unix::ffi::OsStrExt;

        fn c_string(s: &OsStr) -> io::Result<CString> {
            CString::new(s.as_bytes()).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
        }

        let path = match c_string(path) {
            Ok(path) => path,
            Err(err) => return err,
        };
        let argv = match argv
            .iter()
            .map(|arg| c_string(arg))
            .collect::<io::Result<Vec<_>>>()
        {
            Ok(argv) => argv,
            Err(err) => return err,
        };

        match execv(&path, &argv) {
            Ok(never) => match never {},
            Err(errno) => errno.into(),
        }
    }
}

/// Runs the executable as a child, waits for it and exits with its exit code.
///
/// Used where in-place image replacement is unavailable. The shell stays alive as
/// the parent of the program, but the observable exit code is the program's own.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnReplacer;

impl ProcessReplacer for SpawnReplacer {
    fn replace(&self, path: &OsStr, argv: &[OsString]) -> io::Error {
        let mut cmd = std::process::Command::new(launch_path(Path::new(path)).as_ref());
        if let Some((arg0, args)) = argv.split_first() {
            cmd.args(args);
            #[cfg(unix)]
            {
                use std::os::unix::process::CommandExt;
                cmd.arg0(arg0);
            }
            #[cfg(not(unix))]
            let _ = arg0;
        }
        match cmd.status() {
            Ok(status) => std::process::exit(exit_code(status)),
            Err(err) => err,
        }
    }
}

/// Replacer used by the shell binary on this platform.
#[cfg(unix)]
pub type DefaultReplacer = ExecReplacer;

/// Replacer used by the shell binary on this platform.
#[cfg(not(unix))]
pub type DefaultReplacer = SpawnReplacer;

/// Make a bare file name refer to the working directory.
///
/// `std::process::Command` searches `PATH` for names without a separator, which
/// `execv` never does.
fn launch_path(path: &Path) -> Cow<'_, Path> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(_)), None) => Cow::Owned(Path::new(".").join(path)),
        _ => Cow::Borrowed(path),
    }
}

fn exit_code(status: ExitStatus) -> ExitCode {
    match status.code() {
        Some(code) => code,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(signal) => 128 + signal,
        None => 255,
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> ExitCode {
    255
}

/// The `run` verb: hand the process over to another program.
pub struct Run {
    path: OsString,
    argv: Vec<OsString>,
    replacer: Box<dyn ProcessReplacer>,
}

impl ExecutableCommand for Run {
    fn execute(self: Box<Self>, io: &mut Streams<'_>, _env: &Environment) -> Result<ExitCode> {
        debug!(
            "run {} with {} forwarded argument(s)",
            Path::new(&self.path).display(),
            self.argv.len() - 1
        );
        io.flush()?;
        let err = self.replacer.replace(&self.path, &self.argv);
        debug!("replacing process failed: {err}");
        Err(ShellError::RunFailed(err).into())
    }
}

/// Factory for the `run` verb.
#[derive(Debug, Clone, Default)]
pub struct Launcher<R> {
    replacer: R,
}

impl<R> Launcher<R> {
    pub fn new(replacer: R) -> Self {
        Self { replacer }
    }
}

impl<R: ProcessReplacer + Clone + 'static> CommandFactory for Launcher<R> {
    fn try_create(
        &self,
        env: &Environment,
        name: &OsStr,
        args: &[OsString],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name != OsStr::new("run") {
            return None;
        }
        Some(match args.split_first() {
            Some((path, forwarded)) => Box::new(Run {
                path: path.clone(),
                argv: env.forwarded_argv(forwarded),
                replacer: Box::new(self.replacer.clone()),
            }),
            None => Box::new(InvalidArgs(ShellError::MissingArgument(Operand::Path))),
        })
    }
}
