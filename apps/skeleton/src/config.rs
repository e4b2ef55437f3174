//! Runtime settings for the skeleton CLI.
//!
//! There is no configuration file. Every setting has a built-in default and
//! can be overridden through an environment variable:
//!
//! | Variable | Default |
//! |---|---|
//! | `SKELETON_TEMPLATE_DIR` | the template embedded in the binary |
//! | `SKELETON_INSTALLER` | `npm` |
//! | `SKELETON_LOG` | `warn` (falls back to `RUST_LOG`) |
//!
//! Empty values are treated as unset.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::project::{InstallCommand, TemplateSource};

/// Environment variable to override the template root directory.
pub const TEMPLATE_DIR_ENV: &str = "SKELETON_TEMPLATE_DIR";

/// Environment variable to override the dependency installer program.
pub const INSTALLER_ENV: &str = "SKELETON_INSTALLER";

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "SKELETON_LOG";

/// Filter used when neither `SKELETON_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Settings resolved once at startup and threaded through the commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// The template tree to copy.
    pub template: TemplateSource,
    /// Command run in each project part to install its dependencies.
    pub installer: InstallCommand,
}

impl Settings {
    /// Resolves settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Resolves settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let template = non_empty(TEMPLATE_DIR_ENV).map_or(TemplateSource::Bundled, |dir| {
            TemplateSource::Directory(PathBuf::from(dir))
        });

        let installer = match non_empty(INSTALLER_ENV) {
            Some(program) => InstallCommand::with_program(program),
            None => InstallCommand::default(),
        };

        Self {
            template,
            installer,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
