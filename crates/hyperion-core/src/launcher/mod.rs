//! Launch orchestration: grid type lookup, executable selection, optional MPI
//! prefix, one blocking subprocess, then output verification.

mod dispatch;
mod mpi;
mod process;

pub use dispatch::{MPI_EXECUTABLE_SUFFIX, executable_stem, select_executable};
pub use mpi::{MPI_LAUNCHER_CANDIDATES, find_mpi_launcher, resolve_mpi_command};
pub use process::{
    OVERWRITE_FLAG, ProcessResult, ProcessRunner, ShellRunner, build_command_line, shell_quote,
};

use crate::config::LauncherConfig;
use crate::datafile::{DataFileReader, read_grid_type, verify_output};
use crate::domain::{Executable, GridType, LaunchResult, MpiInvocation, RunOutcome, RunRequest};
use crate::environment::LaunchEnvironment;
use serde::Serialize;
use std::path::PathBuf;

/// Everything decided before the simulation process starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub grid_type: GridType,
    pub executable: Executable,
    pub mpi: Option<MpiInvocation>,
    pub command_line: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub plan: LaunchPlan,
    pub process: ProcessResult,
    pub outcome: RunOutcome,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

pub struct Launcher<E, R, P> {
    env: E,
    reader: R,
    runner: P,
    config_path: Option<PathBuf>,
}

impl<E, R, P> Launcher<E, R, P>
where
    E: LaunchEnvironment,
    R: DataFileReader,
    P: ProcessRunner,
{
    pub fn new(env: E, reader: R, runner: P) -> Self {
        Self {
            env,
            reader,
            runner,
            config_path: None,
        }
    }

    /// Reads the configuration from `path` instead of `~/.hyperionrc`.
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// The configuration is only consulted for parallel runs.
    fn load_config(&self) -> LaunchResult<LauncherConfig> {
        let path = self
            .config_path
            .clone()
            .or_else(|| LauncherConfig::default_path(&self.env));
        match path {
            Some(path) => LauncherConfig::load(&path),
            None => Ok(LauncherConfig::default()),
        }
    }

    pub fn plan(&self, request: &RunRequest) -> LaunchResult<LaunchPlan> {
        let grid_type = read_grid_type(&self.reader, &request.input)?;
        let executable = select_executable(grid_type, request.cores);
        let mpi = match request.cores {
            Some(cores) => {
                let config = self.load_config()?;
                Some(resolve_mpi_command(&config, &self.env, cores)?)
            }
            None => None,
        };
        let command_line = build_command_line(&executable, mpi.as_ref(), request)?;

        Ok(LaunchPlan {
            grid_type,
            executable,
            mpi,
            command_line,
        })
    }

    pub fn run(&self, request: &RunRequest) -> LaunchResult<RunReport> {
        let plan = self.plan(request)?;

        tracing::info!(command = %plan.command_line, "starting {}", plan.executable);
        let process = self.runner.run(&plan.command_line)?;
        tracing::debug!(code = ?process.code, "simulation process exited");

        let completed = verify_output(&self.reader, &request.output);
        let outcome = RunOutcome::from_verification(completed, process.code);
        if !completed {
            tracing::info!(output = %request.output.display(), "completion marker missing");
        }

        Ok(RunReport {
            input: request.input.clone(),
            output: request.output.clone(),
            plan,
            process,
            outcome,
        })
    }
}
