//! Process-wide state the launcher depends on: the home directory and the
//! executable search path.

use std::path::{Path, PathBuf};

pub trait LaunchEnvironment {
    fn home_dir(&self) -> Option<PathBuf>;

    /// Directories to scan for executables, in lookup order.
    fn search_path(&self) -> Vec<PathBuf>;

    fn is_executable(&self, path: &Path) -> bool;
}

impl<T> LaunchEnvironment for &T
where
    T: LaunchEnvironment + ?Sized,
{
    fn home_dir(&self) -> Option<PathBuf> {
        (**self).home_dir()
    }

    fn search_path(&self) -> Vec<PathBuf> {
        (**self).search_path()
    }

    fn is_executable(&self, path: &Path) -> bool {
        (**self).is_executable(path)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl LaunchEnvironment for SystemEnvironment {
    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn search_path(&self) -> Vec<PathBuf> {
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).collect())
            .unwrap_or_default()
    }

    #[cfg(unix)]
    fn is_executable(&self, path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        path.metadata()
            .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    fn is_executable(&self, path: &Path) -> bool {
        path.is_file()
    }
}
