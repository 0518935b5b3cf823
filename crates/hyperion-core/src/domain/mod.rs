pub mod errors;

pub use errors::{Diagnostic, LaunchError, LaunchErrorCategory, LaunchResult};

use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

/// Coordinate-system kind of a model grid, as tagged in the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridType {
    Cartesian,
    CylindricalPolar,
    SphericalPolar,
    Amr,
    Octree,
    Voronoi,
}

impl GridType {
    pub const ALL: [GridType; 6] = [
        Self::Cartesian,
        Self::CylindricalPolar,
        Self::SphericalPolar,
        Self::Amr,
        Self::Octree,
        Self::Voronoi,
    ];

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Cartesian => "car",
            Self::CylindricalPolar => "cyl",
            Self::SphericalPolar => "sph",
            Self::Amr => "amr",
            Self::Octree => "oct",
            Self::Voronoi => "vor",
        }
    }

    pub fn tag_list() -> String {
        Self::ALL
            .iter()
            .map(|grid_type| grid_type.tag())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parses a tag as stored in the file. Fixed-length HDF5 strings come
    /// back NUL padded, so padding and surrounding whitespace are ignored.
    pub fn from_tag(raw: &str) -> LaunchResult<Self> {
        let tag = raw.trim_end_matches('\0').trim();
        Self::ALL
            .iter()
            .copied()
            .find(|grid_type| grid_type.tag() == tag)
            .ok_or_else(|| LaunchError::UnsupportedGridType {
                tag: tag.to_string(),
            })
    }
}

impl FromStr for GridType {
    type Err = LaunchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

impl Display for GridType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).tag())
    }
}

impl Serialize for GridType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.tag())
    }
}

/// A pre-built simulation binary selected for one grid type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executable {
    pub grid_type: GridType,
    pub parallel: bool,
}

impl Executable {
    pub fn name(&self) -> String {
        let stem = crate::launcher::executable_stem(self.grid_type);
        if self.parallel {
            format!("{stem}{}", crate::launcher::MPI_EXECUTABLE_SUFFIX)
        } else {
            stem.to_string()
        }
    }
}

impl Display for Executable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for Executable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub overwrite: bool,
    pub cores: Option<NonZeroUsize>,
}

impl RunRequest {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            overwrite: false,
            cores: None,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_cores(mut self, cores: Option<NonZeroUsize>) -> Self {
        self.cores = cores;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MpiCommandSource {
    Configuration,
    SearchPath(PathBuf),
}

/// Command prefix that starts the parallel executable on `cores` processes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MpiInvocation {
    pub command: String,
    pub cores: NonZeroUsize,
    pub source: MpiCommandSource,
}

impl MpiInvocation {
    pub fn prefix(&self) -> String {
        format!("{} -n {}", self.command, self.cores)
    }
}

/// Result of a launch as judged by the completion marker, not by the
/// subprocess exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed { exit_code: i32 },
    Incomplete,
}

impl RunOutcome {
    pub const INCOMPLETE_EXIT_CODE: i32 = 1;

    pub fn from_verification(completed: bool, process_code: Option<i32>) -> Self {
        if !completed {
            return Self::Incomplete;
        }
        Self::Completed {
            exit_code: process_code.unwrap_or(Self::INCOMPLETE_EXIT_CODE),
        }
    }

    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Completed { exit_code } => exit_code,
            Self::Incomplete => Self::INCOMPLETE_EXIT_CODE,
        }
    }

    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    /// Line printed to stderr for this outcome, if any.
    pub const fn diagnostic(self) -> Option<&'static str> {
        match self {
            Self::Completed { .. } => None,
            Self::Incomplete => Some(crate::INCOMPLETE_RUN_MESSAGE),
        }
    }
}
