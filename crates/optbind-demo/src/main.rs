//! optbind-demo: a small multi-command tool built on optbind.
//!
//! ```text
//! optbind-demo greet [-n COUNT] [--shout] NAME
//! optbind-demo sum [--average] [--label TEXT] NUMBERS...
//! optbind-demo describe COMMAND
//! optbind-demo help [COMMAND]
//! ```
//!
//! Any argument of the form `@file` is replaced by the lines of that file.
//! Set `OPTBIND_LOG` (e.g. `OPTBIND_LOG=debug`) to see what the parser does.

mod commands;

use anyhow::Result;
use optbind::command::CommandError;
use optbind::Arguments;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "OPTBIND_LOG";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    // Expand response files up front so a command name may come from one.
    let args = Arguments::from_env().to_vec()?;

    match commands::registry().dispatch(args.as_slice()) {
        Ok(outcome) => outcome.map(|()| ExitCode::SUCCESS),
        Err(CommandError::Missing) => {
            for line in commands::overview() {
                eprintln!("{line}");
            }
            Ok(ExitCode::from(2))
        }
        Err(err) => Err(err.into()),
    }
}
