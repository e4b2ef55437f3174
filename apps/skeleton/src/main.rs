#![warn(clippy::pedantic)]

//! # skeleton
//!
//! Scaffolds a two-part web application (a `frontend/` and a `backend/`)
//! from a template bundled with the tool, then offers to install the
//! dependencies of both parts.
//!
//! ## Usage
//!
//! ```bash
//! skeleton new demo-app
//! ```
//!
//! `new` is the only subcommand. The target must not exist; it is created by
//! copying the template entry for entry, after which the user is asked whether
//! to run `npm install` in `demo-app/frontend` and `demo-app/backend`.
//!
//! ## Exit Codes
//!
//! - `0` - project created (whether or not dependencies were installed)
//! - `1` - invalid usage, existing target, copy failure, or install failure

mod commands;
mod config;
mod errors;
mod project;
mod style;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::new;
use config::{DEFAULT_LOG_FILTER, LOG_ENV, Settings};
use errors::{FAILURE_EXIT_CODE, SkeletonError};
use style::Palette;

/// Project scaffolding CLI.
#[derive(Parser)]
#[command(
    name = "skeleton",
    author,
    version,
    about = "Scaffold a frontend + backend web application",
    long_about = "Copies the bundled frontend + backend template into a new directory and \
    offers to install the dependencies of both parts.",
    after_help = "\
ENVIRONMENT VARIABLES:
    SKELETON_TEMPLATE_DIR   Template to copy (default: the bundled template)
    SKELETON_INSTALLER      Dependency installer program (default: npm)
    SKELETON_LOG            Log filter, e.g. 'debug' (default: warn)
    NO_COLOR                Disable colored output"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the skeleton CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Create a new project from the bundled template.
    ///
    /// Copies the template into NAME, then asks whether to install the
    /// dependencies of the frontend and backend parts.
    New(new::NewArgs),
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => std::process::exit(handle_parse_error(&e)),
    };

    init_tracing();

    if let Err(e) = run(cli) {
        let exit_code = handle_error(&e);
        std::process::exit(exit_code);
    }
}

/// Prints a clap error and returns the exit code for it.
///
/// `--help` and `--version` succeed; every malformed invocation exits with
/// [`FAILURE_EXIT_CODE`] instead of clap's default of 2.
fn handle_parse_error(e: &clap::Error) -> i32 {
    let _ = e.print();
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => FAILURE_EXIT_CODE,
    }
}

/// Handles an error and returns the appropriate exit code.
///
/// Typed [`SkeletonError`]s are printed with their hint; anything else is
/// printed with its full context chain.
fn handle_error(e: &anyhow::Error) -> i32 {
    let palette = Palette::detect();
    match e.downcast_ref::<SkeletonError>() {
        Some(err) => {
            eprintln!("{} {err}", palette.error("Error:"));
            if let Some(source) = std::error::Error::source(err) {
                eprintln!("  caused by: {source}");
            }
            if let Some(hint) = err.hint() {
                eprintln!("{}", palette.warning(&hint));
            }
            err.exit_code()
        }
        None => {
            eprintln!("{} {e:?}", palette.error("Error:"));
            FAILURE_EXIT_CODE
        }
    }
}

/// Installs the tracing subscriber. Logs go to stderr so they never mix
/// with prompt output.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::from_env();
    tracing::debug!(?settings, "resolved settings");

    match cli.command {
        Some(Commands::New(args)) => new::execute(&args, &settings),
        None => Err(SkeletonError::usage("no command given").into()),
    }
}
