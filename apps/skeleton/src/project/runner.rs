//! Subprocess seam for the dependency installer.
//!
//! The post-scaffold installer never spawns processes directly; it goes
//! through [`CommandRunner`] so its branching can be exercised with a fake.
//! [`SystemRunner`] is the real implementation used by the binary.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

/// Default installer program.
pub const DEFAULT_INSTALLER: &str = "npm";

/// Subcommand passed to the installer, meaning "install declared dependencies".
pub const INSTALL_SUBCOMMAND: &str = "install";

/// A program plus arguments that installs a project's declared dependencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// Program name or path, resolved through `PATH` when not a path.
    pub program: OsString,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
}

impl InstallCommand {
    /// Creates an install command for `program`, keeping the `install` subcommand.
    #[must_use]
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: vec![OsString::from(INSTALL_SUBCOMMAND)],
        }
    }
}

impl Default for InstallCommand {
    fn default() -> Self {
        Self::with_program(DEFAULT_INSTALLER)
    }
}

impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// How an installer invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The process exited with status zero.
    Success,
    /// The process exited non-zero, or was terminated by a signal (`code` is `None`).
    Failed {
        /// Exit code, when the platform reports one.
        code: Option<i32>,
    },
}

/// Runs an install command in a working directory and reports how it ended.
///
/// An `Err` means the process could not be started at all.
pub trait CommandRunner {
    /// Runs `command` with `working_dir` as its current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be spawned.
    fn run(&mut self, command: &InstallCommand, working_dir: &Path) -> io::Result<RunStatus>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn run(&mut self, command: &InstallCommand, working_dir: &Path) -> io::Result<RunStatus> {
        (**self).run(command, working_dir)
    }
}

/// Spawns the installer as a real child process.
///
/// The child inherits stdin, stdout and stderr, so the user sees the
/// installer's own output live and unmodified.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &InstallCommand, working_dir: &Path) -> io::Result<RunStatus> {
        // `which` also resolves `npm.cmd` on Windows, which `Command::new("npm")` does not.
        let program = which::which(&command.program).map_err(|e| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "'{}' not found in PATH: {e}",
                    command.program.to_string_lossy()
                ),
            )
        })?;

        debug!(program = %program.display(), cwd = %working_dir.display(), "spawning installer");

        let status = Command::new(&program)
            .args(&command.args)
            .current_dir(working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()?;

        if status.success() {
            Ok(RunStatus::Success)
        } else {
            Ok(RunStatus::Failed {
                code: status.code(),
            })
        }
    }
}
