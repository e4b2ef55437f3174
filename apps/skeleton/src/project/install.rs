//! Interactive dependency installation after scaffolding.
//!
//! The flow is a small state machine:
//!
//! ```text
//! AwaitingConfirmation --"y"/"yes"--> Installing --> Installed
//!          |
//!          +----- anything else ----> Declined
//! ```
//!
//! `Installing` runs the installer in `frontend/` and then in `backend/`,
//! strictly in that order. The first failing stage stops the flow; later
//! stages are never attempted.
//!
//! Prompt input comes from any [`BufRead`] and messages go to any [`Write`],
//! so the whole flow can be driven from tests without a terminal.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::errors::SkeletonError;
use crate::project::runner::{CommandRunner, InstallCommand, RunStatus};
use crate::style::Palette;

/// Answers accepted as "yes", compared after trimming and lowercasing.
pub const AFFIRMATIVE_ANSWERS: [&str; 2] = ["y", "yes"];

/// Question shown before installing.
pub const PROMPT: &str = "Install frontend and backend dependencies now? [y/N] ";

/// A project part whose dependencies are installed separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStage {
    Frontend,
    Backend,
}

impl InstallStage {
    /// All stages in the order they are installed.
    pub const ALL: [Self; 2] = [Self::Frontend, Self::Backend];

    /// Name of the stage's directory inside the project.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
        }
    }

    /// Path of the stage's directory inside `project_root`.
    #[must_use]
    pub fn dir(self, project_root: &Path) -> PathBuf {
        project_root.join(self.dir_name())
    }
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The user's answer to the install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Accepted,
    Declined,
}

impl Confirmation {
    /// Interprets one line of prompt input. Only `y` and `yes` (any case,
    /// surrounding whitespace ignored) are affirmative.
    #[must_use]
    pub fn parse(answer: &str) -> Self {
        let answer = answer.trim().to_lowercase();
        if AFFIRMATIVE_ANSWERS.contains(&answer.as_str()) {
            Self::Accepted
        } else {
            Self::Declined
        }
    }
}

/// Where the post-scaffold flow currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    AwaitingConfirmation,
    Installing,
    Declined,
}

impl InstallState {
    /// Starting state. A preset answer (from `--yes` or `--no-install`) skips the prompt.
    #[must_use]
    pub const fn initial(preset: Option<Confirmation>) -> Self {
        match preset {
            None => Self::AwaitingConfirmation,
            Some(Confirmation::Accepted) => Self::Installing,
            Some(Confirmation::Declined) => Self::Declined,
        }
    }
}

/// How the post-scaffold flow ended when nothing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Every stage installed successfully.
    Installed,
    /// The user chose not to install; manual instructions were printed.
    Declined,
}

/// Offers and runs dependency installation for a freshly scaffolded project.
pub struct PostScaffoldInstaller<'a, R> {
    project_root: &'a Path,
    display_name: &'a str,
    command: &'a InstallCommand,
    runner: R,
    palette: Palette,
}

impl<'a, R: CommandRunner> PostScaffoldInstaller<'a, R> {
    /// Creates an installer for the project at `project_root`.
    ///
    /// `display_name` is how the project is referred to in guidance (the
    /// name the user typed), `command` is the installer to run per stage.
    pub fn new(
        project_root: &'a Path,
        display_name: &'a str,
        command: &'a InstallCommand,
        runner: R,
        palette: Palette,
    ) -> Self {
        Self {
            project_root,
            display_name,
            command,
            runner,
            palette,
        }
    }

    /// Runs the flow from [`InstallState::initial`] until it ends.
    ///
    /// `input` is read only in the `AwaitingConfirmation` state; end of input
    /// counts as a decline.
    ///
    /// # Errors
    ///
    /// Returns [`SkeletonError::Install`] naming the failing stage if an
    /// installer cannot be started or exits non-zero, or an I/O error if the
    /// prompt cannot be read or messages cannot be written.
    pub fn prompt_and_install<I: BufRead, O: Write>(
        &mut self,
        preset: Option<Confirmation>,
        input: &mut I,
        output: &mut O,
    ) -> Result<InstallOutcome> {
        let mut state = InstallState::initial(preset);
        loop {
            debug!(?state, "post-scaffold step");
            state = match state {
                InstallState::AwaitingConfirmation => match self.confirm(input, output)? {
                    Confirmation::Accepted => InstallState::Installing,
                    Confirmation::Declined => InstallState::Declined,
                },
                InstallState::Installing => {
                    self.install_all(output)?;
                    self.print_start_guidance(output)?;
                    return Ok(InstallOutcome::Installed);
                }
                InstallState::Declined => {
                    self.print_manual_guidance(output)?;
                    return Ok(InstallOutcome::Declined);
                }
            };
        }
    }

    fn confirm<I: BufRead, O: Write>(
        &self,
        input: &mut I,
        output: &mut O,
    ) -> Result<Confirmation> {
        write!(output, "{}", self.palette.info(PROMPT))?;
        output.flush()?;

        // Raw bytes: an answer that is not valid UTF-8 is still just a decline.
        let mut line = Vec::new();
        input
            .read_until(b'\n', &mut line)
            .context("Failed to read answer to the install prompt")?;

        // A closed stdin never produces a newline; keep the terminal tidy.
        if !line.ends_with(b"\n") {
            writeln!(output)?;
        }

        Ok(Confirmation::parse(&String::from_utf8_lossy(&line)))
    }

    fn install_all<O: Write>(&mut self, output: &mut O) -> Result<()> {
        for stage in InstallStage::ALL {
            self.install_stage(stage, output)?;
        }
        Ok(())
    }

    fn install_stage<O: Write>(&mut self, stage: InstallStage, output: &mut O) -> Result<()> {
        let dir = stage.dir(self.project_root);
        writeln!(
            output,
            "{}",
            self.palette
                .info(&format!("Installing {stage} dependencies ({})...", self.command))
        )?;
        // The installer writes straight to the terminal; our buffered text goes first.
        output.flush()?;

        if !dir.is_dir() {
            warn!(%stage, dir = %dir.display(), "stage directory missing");
            let missing = std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("directory not found: {}", dir.display()),
            );
            return Err(SkeletonError::install_spawn(
                stage,
                format!("could not start `{}`", self.command),
                missing,
            )
            .into());
        }

        info!(%stage, dir = %dir.display(), "running dependency installer");
        match self.runner.run(self.command, &dir) {
            Ok(RunStatus::Success) => {
                info!(%stage, "dependency installer finished");
                Ok(())
            }
            Ok(RunStatus::Failed { code }) => {
                warn!(%stage, ?code, "dependency installer failed");
                let reason = match code {
                    Some(code) => format!("`{}` exited with code {code}", self.command),
                    None => format!("`{}` was terminated by a signal", self.command),
                };
                Err(SkeletonError::install(stage, reason).into())
            }
            Err(e) => {
                warn!(%stage, error = %e, "dependency installer could not start");
                Err(SkeletonError::install_spawn(
                    stage,
                    format!("could not start `{}`", self.command),
                    e,
                )
                .into())
            }
        }
    }

    fn print_manual_guidance<O: Write>(&self, output: &mut O) -> Result<()> {
        writeln!(
            output,
            "{}",
            self.palette
                .warning("Skipping dependency installation. Install them manually:")
        )?;
        for stage in InstallStage::ALL {
            let dir = Path::new(self.display_name).join(stage.dir_name());
            writeln!(
                output,
                "  {}",
                self.palette
                    .command(&format!("cd {} && {}", dir.display(), self.command))
            )?;
        }
        Ok(())
    }

    fn print_start_guidance<O: Write>(&self, output: &mut O) -> Result<()> {
        writeln!(output)?;
        writeln!(
            output,
            "{}",
            self.palette.success("Dependencies installed. You can now:")
        )?;
        for stage in InstallStage::ALL {
            let dir = Path::new(self.display_name).join(stage.dir_name());
            writeln!(
                output,
                "  {}",
                self.palette
                    .command(&format!("cd {} && npm run dev", dir.display()))
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::{self, Cursor};

    /// Records every invocation and replays canned results.
    #[derive(Default)]
    struct FakeRunner {
        calls: Vec<PathBuf>,
        results: VecDeque<io::Result<RunStatus>>,
    }

    impl FakeRunner {
        fn with_results(results: impl IntoIterator<Item = io::Result<RunStatus>>) -> Self {
            Self {
                calls: Vec::new(),
                results: results.into_iter().collect(),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(
            &mut self,
            _command: &InstallCommand,
            working_dir: &Path,
        ) -> io::Result<RunStatus> {
            self.calls.push(working_dir.to_path_buf());
            self.results.pop_front().unwrap_or(Ok(RunStatus::Success))
        }
    }

    fn project() -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("frontend")).unwrap();
        std::fs::create_dir(temp.path().join("backend")).unwrap();
        temp
    }

    fn run_flow(
        root: &Path,
        runner: &mut FakeRunner,
        preset: Option<Confirmation>,
        answer: impl AsRef<[u8]>,
    ) -> (Result<InstallOutcome>, String) {
        let command = InstallCommand::default();
        let mut installer =
            PostScaffoldInstaller::new(root, "demo-app", &command, runner, Palette::plain());
        let mut input = Cursor::new(answer.as_ref().to_vec());
        let mut output = Vec::new();
        let result = installer.prompt_and_install(preset, &mut input, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    fn failed_stage(result: Result<InstallOutcome>) -> InstallStage {
        match result.unwrap_err().downcast::<SkeletonError>() {
            Ok(SkeletonError::Install { stage, .. }) => stage,
            other => panic!("expected Install error, got {other:?}"),
        }
    }

    #[test]
    fn parse_accepts_only_y_and_yes() {
        for answer in ["y", "Y", "yes", "YES", "Yes", "  y  ", "yes\n", "YES\r\n"] {
            assert_eq!(Confirmation::parse(answer), Confirmation::Accepted, "{answer:?}");
        }
        for answer in ["", "\n", "n", "no", "N", "yep", "ye", "y e s", "ok", "true"] {
            assert_eq!(Confirmation::parse(answer), Confirmation::Declined, "{answer:?}");
        }
    }

    #[test]
    fn initial_state_honours_preset() {
        assert_eq!(InstallState::initial(None), InstallState::AwaitingConfirmation);
        assert_eq!(
            InstallState::initial(Some(Confirmation::Accepted)),
            InstallState::Installing
        );
        assert_eq!(
            InstallState::initial(Some(Confirmation::Declined)),
            InstallState::Declined
        );
    }

    #[test]
    fn negative_answers_never_spawn() {
        let root = project();
        for answer in ["n\n", "no\n", "NO\n", "\n", "", "maybe\n", "  nope  \n"] {
            let mut runner = FakeRunner::default();
            let (result, output) = run_flow(root.path(), &mut runner, None, answer);

            assert_eq!(result.unwrap(), InstallOutcome::Declined, "{answer:?}");
            assert!(runner.calls.is_empty(), "{answer:?}");
            assert!(output.starts_with(PROMPT));
            assert!(output.contains("Install them manually"));
            assert!(output.contains("npm install"));
        }
    }

    #[test]
    fn non_utf8_answer_is_a_decline() {
        let root = project();
        let mut runner = FakeRunner::default();
        let (result, output) = run_flow(root.path(), &mut runner, None, b"\xff\xfe\n");

        assert_eq!(result.unwrap(), InstallOutcome::Declined);
        assert!(runner.calls.is_empty());
        assert!(output.contains("Install them manually"));
    }

    #[test]
    fn decline_guidance_names_both_parts() {
        let root = project();
        let mut runner = FakeRunner::default();
        let (_, output) = run_flow(root.path(), &mut runner, None, "n\n");

        let frontend = Path::new("demo-app").join("frontend");
        let backend = Path::new("demo-app").join("backend");
        assert!(output.contains(&format!("cd {} && npm install", frontend.display())));
        assert!(output.contains(&format!("cd {} && npm install", backend.display())));
    }

    #[test]
    fn affirmative_answer_installs_frontend_then_backend() {
        let root = project();
        let mut runner = FakeRunner::default();
        let (result, output) = run_flow(root.path(), &mut runner, None, "Yes\n");

        assert_eq!(result.unwrap(), InstallOutcome::Installed);
        assert_eq!(
            runner.calls,
            vec![root.path().join("frontend"), root.path().join("backend")]
        );
        let frontend_at = output.find("Installing frontend").unwrap();
        let backend_at = output.find("Installing backend").unwrap();
        assert!(frontend_at < backend_at);
        assert!(output.contains("Dependencies installed"));
        assert!(output.contains("npm run dev"));
    }

    #[test]
    fn frontend_failure_skips_backend() {
        let root = project();
        let mut runner = FakeRunner::with_results([Ok(RunStatus::Failed { code: Some(1) })]);
        let (result, output) = run_flow(root.path(), &mut runner, None, "y\n");

        assert_eq!(failed_stage(result), InstallStage::Frontend);
        assert_eq!(runner.calls, vec![root.path().join("frontend")]);
        assert!(!output.contains("Installing backend"));
        assert!(!output.contains("Dependencies installed"));
    }

    #[test]
    fn backend_failure_is_reported_as_backend() {
        let root = project();
        let mut runner = FakeRunner::with_results([
            Ok(RunStatus::Success),
            Ok(RunStatus::Failed { code: None }),
        ]);
        let (result, _) = run_flow(root.path(), &mut runner, None, "y\n");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("terminated by a signal"));
        assert_eq!(failed_stage(Err(err)), InstallStage::Backend);
        assert_eq!(runner.calls.len(), 2);
    }

    #[test]
    fn spawn_failure_is_an_install_error() {
        let root = project();
        let mut runner = FakeRunner::with_results([Err(io::Error::new(
            io::ErrorKind::NotFound,
            "npm not found",
        ))]);
        let (result, _) = run_flow(root.path(), &mut runner, None, "y\n");

        assert_eq!(failed_stage(result), InstallStage::Frontend);
        assert_eq!(runner.calls.len(), 1);
    }

    #[test]
    fn missing_stage_directory_fails_that_stage() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("frontend")).unwrap();
        let mut runner = FakeRunner::default();
        let (result, _) = run_flow(root.path(), &mut runner, None, "y\n");

        assert_eq!(failed_stage(result), InstallStage::Backend);
        assert_eq!(runner.calls, vec![root.path().join("frontend")]);
    }

    #[test]
    fn preset_answer_skips_the_prompt() {
        let root = project();

        let mut runner = FakeRunner::default();
        let (result, output) =
            run_flow(root.path(), &mut runner, Some(Confirmation::Accepted), "n\n");
        assert_eq!(result.unwrap(), InstallOutcome::Installed);
        assert_eq!(runner.calls.len(), 2);
        assert!(!output.contains(PROMPT));

        let mut runner = FakeRunner::default();
        let (result, output) =
            run_flow(root.path(), &mut runner, Some(Confirmation::Declined), "y\n");
        assert_eq!(result.unwrap(), InstallOutcome::Declined);
        assert!(runner.calls.is_empty());
        assert!(!output.contains(PROMPT));
    }

    #[test]
    fn closed_input_still_ends_the_prompt_line() {
        let root = project();
        let mut runner = FakeRunner::default();
        let (_, output) = run_flow(root.path(), &mut runner, None, "");

        assert!(output.starts_with(&format!("{PROMPT}\n")));
    }
}
