use std::fmt::{Display, Formatter};
use std::path::PathBuf;

use super::GridType;
use crate::launcher::MPI_LAUNCHER_CANDIDATES;

pub type LaunchResult<T> = Result<T, LaunchError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchErrorCategory {
    InputValidationError,
    IoSystemError,
    InternalError,
}

impl LaunchErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::InternalError => 4,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::InternalError => "InternalError",
        }
    }
}

/// Fatal launcher failures. All of them stop the run before (or instead of)
/// the simulation executable being started.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("cannot read grid type from '{}': {reason}", .path.display())]
    DataFormat { path: PathBuf, reason: String },

    #[error("unsupported grid type '{tag}'; expected one of: {}", GridType::tag_list())]
    UnsupportedGridType { tag: String },

    #[error(
        "no MPI launcher found; set 'command' in the [mpi] section of the configuration file or put one of {} on PATH",
        MPI_LAUNCHER_CANDIDATES.join(", ")
    )]
    MpiLauncherNotFound,

    #[error("invalid configuration file '{}': {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("cannot pass '{}' to the shell: {reason}", .path.display())]
    UnquotablePath { path: PathBuf, reason: &'static str },

    #[error("failed to execute '{command_line}': {source}")]
    Spawn {
        command_line: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    pub const fn category(&self) -> LaunchErrorCategory {
        match self {
            Self::UnsupportedGridType { .. }
            | Self::Config { .. }
            | Self::UnquotablePath { .. } => LaunchErrorCategory::InputValidationError,
            Self::DataFormat { .. } | Self::MpiLauncherNotFound | Self::Spawn { .. } => {
                LaunchErrorCategory::IoSystemError
            }
        }
    }

    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::DataFormat { .. } => "IO.GRID_TYPE",
            Self::UnsupportedGridType { .. } => "INPUT.GRID_TYPE",
            Self::MpiLauncherNotFound => "IO.MPI_LAUNCHER",
            Self::Config { .. } => "INPUT.CONFIG",
            Self::UnquotablePath { .. } => "INPUT.PATH",
            Self::Spawn { .. } => "IO.SPAWN",
        }
    }

    pub const fn exit_code(&self) -> i32 {
        self.category().exit_code()
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic::new(self.category(), self.placeholder(), self.to_string())
    }
}

/// Renderable form of a fatal error, shared by the core and the CLI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    category: LaunchErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl Diagnostic {
    pub fn new(
        category: LaunchErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(LaunchErrorCategory::InputValidationError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(LaunchErrorCategory::InternalError, placeholder, message)
    }

    pub const fn category(&self) -> LaunchErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.as_str(),
            self.placeholder,
            self.message
        )
    }
}
