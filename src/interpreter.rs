use crate::builtin::USAGE;
use crate::command::{CommandFactory, ExitCode, FAILURE, Streams};
use crate::env::Environment;
use crate::error::ShellError;
use anyhow::Result;
use log::debug;
use std::ffi::{OsStr, OsString};
use std::io::Write;

/// Factory for commands defined in this crate.
///
/// Builtins get their [`CommandFactory`] impl through this type.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// Dispatches one invocation to the first factory that recognizes its verb.
///
/// Example
/// ```
/// use nanoshell::Interpreter;
/// use nanoshell::command::Streams;
/// use nanoshell::env::Environment;
/// use std::ffi::OsString;
///
/// let sh = Interpreter::with_defaults(Environment::new("nanoshell"));
/// let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
/// let code = sh.dispatch(&[OsString::from("help")], &mut Streams::new(&mut out, &mut err)).unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(out, nanoshell::USAGE.as_bytes());
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create an interpreter with a custom set of command factories.
    pub fn new(env: Environment, commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self { env, commands }
    }

    /// Create an interpreter knowing `help`, `mv` and `run`, where `run` replaces the
    /// process with the platform's [`DefaultReplacer`](crate::DefaultReplacer).
    pub fn with_defaults(env: Environment) -> Self {
        use crate::builtin::{Help, Mv};
        use crate::external::{DefaultReplacer, Launcher};
        Self::new(
            env,
            vec![
                Box::new(Factory::<Help>::default()),
                Box::new(Launcher::new(DefaultReplacer::default())),
                Box::new(Factory::<Mv>::default()),
            ],
        )
    }

    /// Handle the arguments following the program name.
    ///
    /// Without a verb the usage text and `Command expected` go to standard error.
    pub fn dispatch(&self, args: &[OsString], io: &mut Streams<'_>) -> Result<ExitCode> {
        match args.split_first() {
            Some((name, rest)) => self.run(name, rest, io),
            None => {
                io.stderr.write_all(USAGE.as_bytes())?;
                ShellError::CommandExpected.report(io.stderr)?;
                Ok(FAILURE)
            }
        }
    }

    /// Run a single verb with its operands.
    ///
    /// Failures the shell knows about are written to standard error, preceded by a
    /// blank line, and turn into exit code 1. Only I/O errors on the output streams
    /// themselves are returned as `Err`.
    pub fn run(&self, name: &OsStr, args: &[OsString], io: &mut Streams<'_>) -> Result<ExitCode> {
        let Some(cmd) = self
            .commands
            .iter()
            .find_map(|factory| factory.try_create(&self.env, name, args))
        else {
            let err = ShellError::UnexpectedCommand(name.to_string_lossy().into_owned());
            return Self::fail(&err, io);
        };

        debug!("executing {}", name.to_string_lossy());
        match cmd.execute(io, &self.env) {
            Ok(code) => Ok(code),
            Err(err) => match err.downcast::<ShellError>() {
                Ok(err) => Self::fail(&err, io),
                Err(other) => Err(other),
            },
        }
    }

    fn fail(err: &ShellError, io: &mut Streams<'_>) -> Result<ExitCode> {
        debug!("{:?}", err);
        io.stderr.write_all(b"\n")?;
        err.report(io.stderr)?;
        Ok(FAILURE)
    }
}
