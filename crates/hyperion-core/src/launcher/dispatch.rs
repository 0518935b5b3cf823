use crate::domain::{Executable, GridType};
use std::num::NonZeroUsize;

pub const MPI_EXECUTABLE_SUFFIX: &str = "_mpi";

/// Base name of the serial binary built for `grid_type`.
pub const fn executable_stem(grid_type: GridType) -> &'static str {
    match grid_type {
        GridType::Cartesian => "hyperion_car",
        GridType::CylindricalPolar => "hyperion_cyl",
        GridType::SphericalPolar => "hyperion_sph",
        GridType::Amr => "hyperion_amr",
        GridType::Octree => "hyperion_oct",
        GridType::Voronoi => "hyperion_vor",
    }
}

/// Picks the simulation binary for `grid_type`; any core count selects the
/// MPI build.
pub fn select_executable(grid_type: GridType, cores: Option<NonZeroUsize>) -> Executable {
    let executable = Executable {
        grid_type,
        parallel: cores.is_some(),
    };
    tracing::debug!(%grid_type, executable = %executable, "selected executable");
    executable
}
