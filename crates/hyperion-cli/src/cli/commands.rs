use super::CliError;
use super::helpers::write_report;
use hyperion_core::{Hdf5Reader, Launcher, RunRequest, ShellRunner, SystemEnvironment};
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct LaunchArgs {
    /// Input model file
    #[arg(value_name = "input")]
    input: PathBuf,

    /// Output file written by the simulation
    #[arg(value_name = "output")]
    output: PathBuf,

    /// Overwrite the output file if it already exists
    #[arg(short = 'f')]
    force: bool,

    /// Run the MPI build on this many cores
    #[arg(short = 'm', value_name = "n_cores")]
    cores: Option<NonZeroUsize>,

    /// Launcher configuration file (default: ~/.hyperionrc)
    #[arg(long, value_name = "path")]
    config: Option<PathBuf>,

    /// Write a JSON summary of the launch to this path
    #[arg(long, value_name = "path")]
    report: Option<PathBuf>,
}

impl LaunchArgs {
    fn request(&self) -> RunRequest {
        RunRequest::new(&self.input, &self.output)
            .with_overwrite(self.force)
            .with_cores(self.cores)
    }
}

pub(super) fn run_launch_command(args: LaunchArgs) -> Result<i32, CliError> {
    let request = args.request();
    let launcher = Launcher::new(SystemEnvironment, Hdf5Reader, ShellRunner)
        .with_config_path(args.config);

    let report = launcher.run(&request)?;
    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }

    if let Some(message) = report.outcome.diagnostic() {
        eprintln!("{message}");
    }
    Ok(report.exit_code())
}
