//! New project command for the skeleton CLI.
//!
//! Copies the bundled template into a new directory and offers to install
//! dependencies for its `frontend` and `backend` parts.
//!
//! ## Usage
//!
//! ```bash
//! skeleton new demo-app              # Create ./demo-app, then ask about installing
//! skeleton new /srv/apps/demo-app    # Absolute paths work too
//! skeleton new demo-app --yes        # Install without asking
//! skeleton new demo-app --no-install # Skip installation without asking
//! ```
//!
//! ## Project Structure
//!
//! ```text
//! demo-app/
//! +-- backend/
//! |   +-- index.js
//! |   +-- package.json
//! +-- frontend/
//!     +-- index.html
//!     +-- package.json
//!     +-- vite.config.js
//!     +-- src/
//!         +-- App.js
//!         +-- main.jsx
//! ```

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use crate::config::Settings;
use crate::project::runner::CommandRunner;
use crate::project::{
    Confirmation, InstallOutcome, PostScaffoldInstaller, ProjectRequest, SystemRunner,
    create_project,
};
use crate::style::Palette;

/// Arguments for the `new` command.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Name of the project directory to create.
    ///
    /// Relative names are resolved against the current directory; absolute
    /// paths are used as given. The path must not exist yet.
    pub name: String,

    /// Install dependencies without asking.
    #[clap(short = 'y', long = "yes", action = clap::ArgAction::SetTrue)]
    pub yes: bool,

    /// Skip dependency installation without asking.
    #[clap(long = "no-install", action = clap::ArgAction::SetTrue, conflicts_with = "yes")]
    pub no_install: bool,
}

impl NewArgs {
    /// The install answer given on the command line, if any.
    #[must_use]
    pub const fn preset(&self) -> Option<Confirmation> {
        if self.yes {
            Some(Confirmation::Accepted)
        } else if self.no_install {
            Some(Confirmation::Declined)
        } else {
            None
        }
    }
}

/// Executes the `new` command.
///
/// # Errors
///
/// Returns an error if:
/// - The project name is empty
/// - The target path already exists
/// - Copying the template fails (files written so far are kept)
/// - A dependency installation stage fails
pub fn execute(args: &NewArgs, settings: &Settings) -> Result<()> {
    let working_dir =
        std::env::current_dir().context("Failed to resolve the current working directory")?;
    let palette = Palette::detect();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    let outcome = scaffold(
        args,
        settings,
        &working_dir,
        SystemRunner,
        palette,
        &mut input,
        &mut output,
    )?;
    debug!(?outcome, "new finished");
    Ok(())
}

/// Runs the whole `new` flow against an explicit working directory.
fn scaffold<R, I, O>(
    args: &NewArgs,
    settings: &Settings,
    working_dir: &Path,
    runner: R,
    palette: Palette,
    input: &mut I,
    output: &mut O,
) -> Result<InstallOutcome>
where
    R: CommandRunner,
    I: BufRead,
    O: Write,
{
    let request = ProjectRequest::resolve(&args.name, working_dir)?;

    writeln!(
        output,
        "{}",
        palette.success(&format!("Creating app in {} ...", request.target.display()))
    )?;
    let template = settings.template.resolved_against(working_dir);
    let report = create_project(&request, &template)?;
    writeln!(
        output,
        "Created project '{}' ({} files, {} directories)",
        request.name, report.files, report.directories
    )?;

    let mut installer = PostScaffoldInstaller::new(
        &request.target,
        &request.name,
        &settings.installer,
        runner,
        palette,
    );
    installer.prompt_and_install(args.preset(), input, output)
}
