use crate::config::LauncherConfig;
use crate::domain::{LaunchError, LaunchResult, MpiCommandSource, MpiInvocation};
use crate::environment::LaunchEnvironment;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Launcher binaries probed on the search path, most preferred first.
pub const MPI_LAUNCHER_CANDIDATES: [&str; 2] = ["mpirun", "mpiexec"];

/// Uses the configured MPI command verbatim when there is one, otherwise the
/// first launcher found on the search path.
pub fn resolve_mpi_command(
    config: &LauncherConfig,
    env: &impl LaunchEnvironment,
    cores: NonZeroUsize,
) -> LaunchResult<MpiInvocation> {
    if let Some(command) = &config.mpi_command {
        tracing::debug!(%command, "using configured MPI command");
        return Ok(MpiInvocation {
            command: command.clone(),
            cores,
            source: MpiCommandSource::Configuration,
        });
    }

    let (name, path) = find_mpi_launcher(env).ok_or(LaunchError::MpiLauncherNotFound)?;
    tracing::debug!(launcher = name, path = %path.display(), "found MPI launcher on search path");
    Ok(MpiInvocation {
        command: name.to_string(),
        cores,
        source: MpiCommandSource::SearchPath(path),
    })
}

/// Scans directory by directory; within one directory the candidates are
/// tried in preference order.
pub fn find_mpi_launcher(env: &impl LaunchEnvironment) -> Option<(&'static str, PathBuf)> {
    env.search_path().into_iter().find_map(|dir| {
        MPI_LAUNCHER_CANDIDATES.iter().find_map(|name| {
            let candidate = dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX));
            env.is_executable(&candidate).then_some((*name, candidate))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::{find_mpi_launcher, resolve_mpi_command};
    use crate::config::LauncherConfig;
    use crate::domain::{LaunchError, MpiCommandSource};
    use crate::environment::testing::FakeEnvironment;
    use std::num::NonZeroUsize;
    use std::path::{Path, PathBuf};

    fn exe(dir: &str, name: &str) -> PathBuf {
        Path::new(dir).join(format!("{name}{}", std::env::consts::EXE_SUFFIX))
    }

    fn cores(count: usize) -> NonZeroUsize {
        NonZeroUsize::new(count).unwrap()
    }

    #[test]
    fn configured_command_wins_over_search_path() {
        let config = LauncherConfig {
            mpi_command: Some("srun --mpi=pmix".to_string()),
        };
        let env = FakeEnvironment::default()
            .with_search_dir("/usr/bin")
            .with_executable(exe("/usr/bin", "mpirun"));

        let invocation = resolve_mpi_command(&config, &env, cores(16)).unwrap();
        assert_eq!(invocation.command, "srun --mpi=pmix");
        assert_eq!(invocation.source, MpiCommandSource::Configuration);
        assert_eq!(invocation.prefix(), "srun --mpi=pmix -n 16");
    }

    #[test]
    fn finds_preferred_launcher() {
        let env = FakeEnvironment::default()
            .with_search_dir("/usr/bin")
            .with_executable(exe("/usr/bin", "mpirun"))
            .with_executable(exe("/usr/bin", "mpiexec"));

        let invocation = resolve_mpi_command(&LauncherConfig::default(), &env, cores(2)).unwrap();
        assert_eq!(invocation.command, "mpirun");
        assert_eq!(
            invocation.source,
            MpiCommandSource::SearchPath(exe("/usr/bin", "mpirun"))
        );
    }

    #[test]
    fn falls_back_to_alternate_launcher() {
        let env = FakeEnvironment::default()
            .with_search_dir("/usr/bin")
            .with_executable(exe("/usr/bin", "mpiexec"));

        let invocation = resolve_mpi_command(&LauncherConfig::default(), &env, cores(2)).unwrap();
        assert_eq!(invocation.command, "mpiexec");
    }

    #[test]
    fn search_is_directory_major() {
        let env = FakeEnvironment::default()
            .with_search_dir("/opt/intel/bin")
            .with_search_dir("/usr/bin")
            .with_executable(exe("/opt/intel/bin", "mpiexec"))
            .with_executable(exe("/usr/bin", "mpirun"));

        let (name, path) = find_mpi_launcher(&env).unwrap();
        assert_eq!(name, "mpiexec");
        assert_eq!(path, exe("/opt/intel/bin", "mpiexec"));
    }

    #[test]
    fn missing_launcher_is_fatal() {
        let env = FakeEnvironment::default().with_search_dir("/usr/bin");
        let error = resolve_mpi_command(&LauncherConfig::default(), &env, cores(2)).unwrap_err();
        assert!(matches!(error, LaunchError::MpiLauncherNotFound));
    }
}
