//! User-level launcher configuration (`~/.hyperionrc`).
//!
//! The file is INI formatted. Only the MPI command is recognised:
//!
//! ```ini
//! [mpi]
//! command = mpiexec --oversubscribe
//! ```

use crate::domain::{LaunchError, LaunchResult};
use crate::environment::LaunchEnvironment;
use ini::Ini;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".hyperionrc";
const MPI_SECTION: &str = "mpi";
const MPI_COMMAND_KEY: &str = "command";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherConfig {
    pub mpi_command: Option<String>,
}

impl LauncherConfig {
    pub fn default_path(env: &impl LaunchEnvironment) -> Option<PathBuf> {
        env.home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Loads the file at `path`. A missing file is an empty configuration.
    pub fn load(path: &Path) -> LaunchResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(source) if source.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no launcher configuration file");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(LaunchError::Config {
                    path: path.to_path_buf(),
                    reason: source.to_string(),
                });
            }
        };

        Self::parse(&content).map_err(|reason| LaunchError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        let ini = Ini::load_from_str(content).map_err(|error| error.to_string())?;
        let mpi_command = ini
            .section(Some(MPI_SECTION))
            .and_then(|section| section.get(MPI_COMMAND_KEY))
            .map(str::trim)
            .filter(|command| !command.is_empty())
            .map(str::to_string);

        Ok(Self { mpi_command })
    }
}
