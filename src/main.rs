use nanoshell::Interpreter;
use nanoshell::command::{FAILURE, Streams};
use nanoshell::env::{DEFAULT_LOG_FILTER, Environment, LOG_ENV};
use std::ffi::OsString;
use std::io::{self, Write};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_ENV, DEFAULT_LOG_FILTER))
        .init();

    let env = Environment::from_process();
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let interpreter = Interpreter::with_defaults(env);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let (mut out, mut err) = (stdout.lock(), stderr.lock());
    let mut streams = Streams::new(&mut out, &mut err);

    let result = interpreter.dispatch(&args, &mut streams).and_then(|code| {
        streams.stdout.flush()?;
        Ok(code)
    });
    let code = match result {
        Ok(code) => code,
        Err(e) => {
            log::debug!("output failed: {e:#}");
            FAILURE
        }
    };
    std::process::exit(code);
}
