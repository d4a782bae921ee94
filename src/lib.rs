//! An extremely lightweight shell for scratch container images.
//!
//! `nanoshell` understands exactly three verbs: `help`, `run` and `mv`. There is no
//! `PATH` lookup, no variable expansion, no quoting, no pipes and no globbing; each
//! invocation runs one verb and exits.
//!
//! The main entry point is [`Interpreter`], which dispatches an argument list to a set of
//! pluggable [`command::CommandFactory`] objects. The public modules [`command`] and
//! [`env`] expose the traits and the invocation context used to build your own verbs.

mod builtin;
pub mod command;
pub mod env;
mod error;
mod external;
mod interpreter;

pub use builtin::{COPY_BUFFER_SIZE, USAGE, move_file, stream_copy};
pub use error::{Operand, ShellError};
#[cfg(unix)]
pub use external::ExecReplacer;
pub use external::{DefaultReplacer, Launcher, ProcessReplacer, SpawnReplacer};
pub use interpreter::Interpreter;
