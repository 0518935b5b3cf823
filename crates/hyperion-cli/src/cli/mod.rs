mod commands;
mod helpers;

use clap::Parser;
use hyperion_core::{Diagnostic, LaunchError};
use std::ffi::OsString;

pub fn run_from_env() -> i32 {
    match run(std::env::args_os()) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic = error.as_diagnostic();
            eprintln!("{}", diagnostic.diagnostic_line());
            eprintln!("{}", diagnostic.fatal_exit_line());
            diagnostic.exit_code()
        }
    }
}

/// `args` includes the program name, as in `std::env::args_os()`.
pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            helpers::init_tracing(cli.verbose);
            commands::run_launch_command(cli.launch)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "hyperion",
    version,
    about = "Run a Hyperion model with the executable matching its grid type"
)]
struct Cli {
    #[command(flatten)]
    launch: commands::LaunchArgs,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Launch(#[from] LaunchError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Usage(message) => {
                Diagnostic::input_validation("INPUT.CLI_USAGE", message.trim_end())
            }
            Self::Launch(error) => error.diagnostic(),
            Self::Internal(error) => Diagnostic::internal("SYS.CLI", format!("{error:#}")),
        }
    }
}
