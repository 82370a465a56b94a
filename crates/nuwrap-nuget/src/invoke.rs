//! Running NuGet.exe with an assembled command.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::NuGetError;
use crate::operation::NuGetCommand;

/// Where and how to run NuGet.exe.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Path to NuGet.exe.
    pub executable: PathBuf,
    /// Program that hosts the executable (e.g. `mono`), if any.
    pub launcher: Option<PathBuf>,
    /// Working directory for the process; inherited when `None`.
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    /// Run `executable` directly in the current working directory.
    pub fn new(executable: &Path) -> Self {
        Self {
            executable: executable.to_path_buf(),
            launcher: None,
            working_dir: None,
        }
    }

    /// Run through `launcher`, passing the executable as its first argument.
    pub fn launcher(mut self, launcher: &Path) -> Self {
        self.launcher = Some(launcher.to_path_buf());
        self
    }

    /// Run in `dir`.
    pub fn working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }
}

/// Outcome of a NuGet.exe run.
#[derive(Debug)]
pub struct InvocationResult {
    /// Whether NuGet.exe exited successfully.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub exit_code: Option<i32>,
    /// Raw stdout.
    pub stdout: String,
    /// Raw stderr.
    pub stderr: String,
}

impl InvocationResult {
    /// Format a human-readable summary of the run.
    pub fn summary(&self, verb: &str) -> String {
        match (self.success, self.exit_code) {
            (true, _) => format!("nuget {verb} succeeded"),
            (false, Some(code)) => format!("nuget {verb} failed with exit code {code}"),
            (false, None) => format!("nuget {verb} was terminated by a signal"),
        }
    }
}

impl NuGetCommand {
    /// Build the process command without running it.
    ///
    /// Without a launcher on Windows the joined command line is passed
    /// through verbatim so NuGet.exe sees exactly the quoting produced here.
    /// Everywhere else the tokens are split into separate arguments.
    pub fn to_command(&self, invocation: &Invocation) -> Command {
        let mut cmd = match &invocation.launcher {
            Some(launcher) => {
                let mut cmd = Command::new(launcher);
                cmd.arg(&invocation.executable).args(self.argv());
                cmd
            }
            None => self.direct_command(&invocation.executable),
        };
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    #[cfg(windows)]
    fn direct_command(&self, executable: &Path) -> Command {
        use std::os::windows::process::CommandExt;

        let mut cmd = Command::new(executable);
        cmd.raw_arg(self.command_line());
        cmd
    }

    #[cfg(not(windows))]
    fn direct_command(&self, executable: &Path) -> Command {
        let mut cmd = Command::new(executable);
        cmd.args(self.argv());
        cmd
    }

    /// Run NuGet.exe and capture its output.
    ///
    /// # Errors
    /// Returns an error if the process cannot be spawned. A non-zero exit
    /// code is reported through `InvocationResult::success`.
    pub fn execute(&self, invocation: &Invocation) -> Result<InvocationResult, NuGetError> {
        let mut cmd = self.to_command(invocation);
        let output = nuwrap_util::process::run_command(&mut cmd)
            .map_err(|source| NuGetError::Exec { source })?;

        Ok(InvocationResult {
            success: output.success,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
