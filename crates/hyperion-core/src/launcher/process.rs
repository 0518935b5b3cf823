use crate::domain::{Executable, LaunchError, LaunchResult, MpiInvocation, RunRequest};
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Flag understood by every Hyperion binary: replace an existing output file.
pub const OVERWRITE_FLAG: &str = "-f";

/// Exit status of the simulation process. `code` is `None` when the process
/// was terminated by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessResult {
    pub code: Option<i32>,
}

impl From<ExitStatus> for ProcessResult {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

pub trait ProcessRunner {
    /// Runs `command_line` through the shell and blocks until it exits.
    /// Standard streams are inherited.
    fn run(&self, command_line: &str) -> LaunchResult<ProcessResult>;
}

impl<T> ProcessRunner for &T
where
    T: ProcessRunner + ?Sized,
{
    fn run(&self, command_line: &str) -> LaunchResult<ProcessResult> {
        (**self).run(command_line)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ShellRunner {
    #[cfg(unix)]
    fn command(command_line: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(command_line);
        command
    }

    #[cfg(windows)]
    fn command(command_line: &str) -> Command {
        let mut command = Command::new("cmd");
        command.arg("/C").arg(command_line);
        command
    }
}

impl ProcessRunner for ShellRunner {
    fn run(&self, command_line: &str) -> LaunchResult<ProcessResult> {
        let status = Self::command(command_line)
            .status()
            .map_err(|source| LaunchError::Spawn {
                command_line: command_line.to_string(),
                source,
            })?;
        Ok(status.into())
    }
}

/// `[<mpi> -n <cores>] <executable> [-f] <input> <output>`
pub fn build_command_line(
    executable: &Executable,
    mpi: Option<&MpiInvocation>,
    request: &RunRequest,
) -> LaunchResult<String> {
    let mut parts: Vec<Cow<'_, str>> = Vec::with_capacity(5);
    if let Some(invocation) = mpi {
        parts.push(Cow::Owned(invocation.prefix()));
    }
    parts.push(Cow::Owned(executable.name()));
    if request.overwrite {
        parts.push(Cow::Borrowed(OVERWRITE_FLAG));
    }
    parts.push(quote_path(&request.input)?);
    parts.push(quote_path(&request.output)?);
    Ok(parts.join(" "))
}

fn quote_path(path: &Path) -> LaunchResult<Cow<'_, str>> {
    let unquotable = |reason| LaunchError::UnquotablePath {
        path: path.to_path_buf(),
        reason,
    };
    let text = path.to_str().ok_or_else(|| unquotable("not valid UTF-8"))?;
    shell_quote(text).ok_or_else(|| unquotable("contains a double quote"))
}

fn is_shell_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '_' | '-' | '+' | ',' | ':' | '=' | '@' | '%')
}

/// Quotes `arg` for the platform shell unless every character is safe bare.
/// `cmd /C` has no escape for `"` inside a quoted argument, so such
/// arguments are refused on Windows.
pub fn shell_quote(arg: &str) -> Option<Cow<'_, str>> {
    if !arg.is_empty() && arg.chars().all(is_shell_safe) {
        return Some(Cow::Borrowed(arg));
    }
    if cfg!(windows) {
        (!arg.contains('"')).then(|| Cow::Owned(format!("\"{arg}\"")))
    } else {
        Some(Cow::Owned(format!("'{}'", arg.replace('\'', r"'\''"))))
    }
}


#[cfg(test)]
mod tests {
    use super::{ProcessRunner, ShellRunner, build_command_line, shell_quote};
    use crate::domain::{
        Executable, GridType, LaunchError, MpiCommandSource, MpiInvocation, RunRequest,
    };
    use std::num::NonZeroUsize;

    #[test]
    fn serial_command_line() {
        let executable = Executable {
            grid_type: GridType::Cartesian,
            parallel: false,
        };
        let request = RunRequest::new("model.rtin", "model.rtout");
        assert_eq!(
            build_command_line(&executable, None, &request).unwrap(),
            "hyperion_car model.rtin model.rtout"
        );
    }

    #[test]
    fn parallel_command_line_with_overwrite() {
        let executable = Executable {
            grid_type: GridType::SphericalPolar,
            parallel: true,
        };
        let mpi = MpiInvocation {
            command: "mpirun".to_string(),
            cores: NonZeroUsize::new(12).unwrap(),
            source: MpiCommandSource::Configuration,
        };
        let request = RunRequest::new("runs/disk.rtin", "runs/disk.rtout")
            .with_overwrite(true)
            .with_cores(NonZeroUsize::new(12));
        assert_eq!(
            build_command_line(&executable, Some(&mpi), &request).unwrap(),
            "mpirun -n 12 hyperion_sph_mpi -f runs/disk.rtin runs/disk.rtout"
        );
    }

    #[test]
    fn safe_arguments_are_left_bare() {
        assert_eq!(
            shell_quote("/data/run_01/model.rtin").as_deref(),
            Some("/data/run_01/model.rtin")
        );
    }

    #[cfg(unix)]
    #[test]
    fn unsafe_arguments_are_single_quoted() {
        assert_eq!(shell_quote("my model.rtin").as_deref(), Some("'my model.rtin'"));
        assert_eq!(shell_quote("it's.rtin").as_deref(), Some(r"'it'\''s.rtin'"));
        assert_eq!(shell_quote("say \"hi\".rtin").as_deref(), Some("'say \"hi\".rtin'"));
        assert_eq!(shell_quote("").as_deref(), Some("''"));
    }

    #[cfg(windows)]
    #[test]
    fn double_quotes_are_refused_on_windows() {
        assert_eq!(shell_quote("my model.rtin").as_deref(), Some("\"my model.rtin\""));
        assert_eq!(shell_quote("say \"hi\".rtin"), None);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_is_refused_instead_of_rewritten() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let executable = Executable {
            grid_type: GridType::Cartesian,
            parallel: false,
        };
        let input = OsStr::from_bytes(b"model\xff.rtin");
        let request = RunRequest::new(input, "model.rtout");

        let error = build_command_line(&executable, None, &request).unwrap_err();
        match error {
            LaunchError::UnquotablePath { path, reason } => {
                assert_eq!(path.as_os_str(), input);
                assert_eq!(reason, "not valid UTF-8");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn shell_runner_reports_exit_code() {
        assert_eq!(ShellRunner.run("exit 0").unwrap().code, Some(0));
        assert_eq!(ShellRunner.run("exit 3").unwrap().code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn shell_runner_reports_signal_termination() {
        let result = ShellRunner.run("kill -9 $$").unwrap();
        assert_eq!(result.code, None);
    }
}
