//! Launcher for Hyperion radiative-transfer runs.
//!
//! The simulation itself lives in separately built binaries, one per grid
//! type (`hyperion_car`, `hyperion_sph`, ...) plus an `_mpi` build of each.
//! This crate picks the right binary for an input model, starts it, and
//! checks the output file for the completion marker afterwards.

pub mod config;
pub mod datafile;
pub mod domain;
pub mod environment;
pub mod launcher;

pub use config::LauncherConfig;
pub use datafile::{DataFileReader, Hdf5Reader};
pub use domain::{
    Diagnostic, Executable, GridType, LaunchError, LaunchErrorCategory, LaunchResult,
    MpiInvocation, RunOutcome, RunRequest,
};
pub use environment::{LaunchEnvironment, SystemEnvironment};
pub use launcher::{LaunchPlan, Launcher, ProcessRunner, RunReport, ShellRunner};

/// Printed when the output file lacks the completion marker.
pub const INCOMPLETE_RUN_MESSAGE: &str = "Hyperion did not complete successfully";
