//! Project scaffolding.
//!
//! ## Modules
//!
//! - [`template`] - Bundled or on-disk template source
//! - [`materialize`] - Copy of the template tree
//! - [`install`] - Interactive dependency installation after the copy
//! - [`runner`] - Subprocess seam used by the installer
//!
//! ## Key Types
//!
//! - [`ProjectRequest`] - Target path, resolved against an explicit working directory
//! - [`PostScaffoldInstaller`] - The prompt-then-install flow

pub mod install;
pub mod materialize;
pub mod runner;
pub mod template;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::SkeletonError;

pub use install::{Confirmation, InstallOutcome, InstallStage, PostScaffoldInstaller};
pub use materialize::{MaterializeReport, materialize, materialize_bundled};
pub use runner::{InstallCommand, SystemRunner};
pub use template::TemplateSource;

/// A request to scaffold one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    /// The name or path exactly as the user typed it.
    pub name: String,
    /// Absolute target directory.
    pub target: PathBuf,
}

impl ProjectRequest {
    /// Resolves `name` against `working_dir`. Absolute names are used as-is.
    ///
    /// # Errors
    ///
    /// Returns [`SkeletonError::Usage`] if `name` is empty or blank.
    pub fn resolve(name: &str, working_dir: &Path) -> Result<Self, SkeletonError> {
        if name.trim().is_empty() {
            return Err(SkeletonError::usage("project name must not be empty"));
        }

        let path = Path::new(name);
        let target = if path.is_absolute() {
            path.to_path_buf()
        } else {
            working_dir.join(path)
        };

        Ok(Self {
            name: name.to_string(),
            target,
        })
    }
}

/// Copies `template` into the request's target.
///
/// The existence guard runs before any write. Anything that is already at the
/// target path, including a file or a dangling symbolic link, aborts with
/// [`SkeletonError::TargetExists`].
///
/// # Errors
///
/// Returns [`SkeletonError::TargetExists`] if the target is taken,
/// [`SkeletonError::FileSystem`] if a template directory is missing, if the
/// target lies inside it, or if the copy fails part-way.
pub fn create_project(
    request: &ProjectRequest,
    template: &TemplateSource,
) -> Result<MaterializeReport, SkeletonError> {
    if std::fs::symlink_metadata(&request.target).is_ok() {
        return Err(SkeletonError::target_exists(&request.target));
    }

    info!(%template, target = %request.target.display(), "materializing template");
    match template {
        TemplateSource::Bundled => materialize_bundled(&request.target),
        TemplateSource::Directory(dir) => {
            check_template_dir(dir, &request.target)?;
            materialize(dir, &request.target)
        }
    }
}

/// Rejects a missing template directory and a target that would land inside
/// it. Both sides are compared in canonical form, so relative and symlinked
/// spellings of the same directory are caught.
fn check_template_dir(template_dir: &Path, target: &Path) -> Result<(), SkeletonError> {
    let template_root = match template_dir.canonicalize() {
        Ok(root) if root.is_dir() => root,
        _ => {
            return Err(SkeletonError::file_system_without_source(
                template_dir,
                "template directory not found",
            )
            .nothing_written());
        }
    };

    if template::canonicalize_nearest(target).starts_with(&template_root) {
        return Err(SkeletonError::file_system_without_source(
            target,
            "target directory lies inside the template",
        )
        .nothing_written());
    }
    Ok(())
}
