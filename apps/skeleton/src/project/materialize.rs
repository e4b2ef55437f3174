//! Copies a template tree into a new project directory.
//!
//! Two sources are supported: the tree embedded in the binary and a template
//! directory on disk. The destination root is created with `create_dir`, so
//! a directory that appears after the existence check is never merged into.
//!
//! A directory template is walked depth first with siblings sorted by file
//! name, so the order in which entries appear on disk is deterministic.
//! Regular files are streamed byte for byte. Symbolic links and special files
//! are rejected.
//!
//! There is no rollback: when the copy fails, every entry written before the
//! failure stays on disk and the error names the offending path.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::template;
use crate::errors::SkeletonError;

/// Counts of what a successful materialization created.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Directories created, including the destination root.
    pub directories: usize,
    /// Regular files copied.
    pub files: usize,
}

/// Copies the tree rooted at `source_root` to `dest_root`.
///
/// The caller is responsible for checking that `dest_root` does not exist.
///
/// # Errors
///
/// Returns [`SkeletonError::TargetExists`] if `dest_root` appeared in the
/// meantime, or [`SkeletonError::FileSystem`] naming the offending path if a
/// template entry cannot be read, a destination entry cannot be written, or
/// the template contains something other than directories and regular files.
pub fn materialize(
    source_root: &Path,
    dest_root: &Path,
) -> Result<MaterializeReport, SkeletonError> {
    let mut report = MaterializeReport::default();
    match copy_tree(source_root, dest_root, &mut report) {
        Ok(()) => Ok(report),
        Err(err) if report.directories == 0 => Err(err.nothing_written()),
        Err(err) => Err(err),
    }
}

/// Writes the template embedded in the binary to `dest_root`.
///
/// # Errors
///
/// Same as [`materialize`], minus the template read failures.
pub fn materialize_bundled(dest_root: &Path) -> Result<MaterializeReport, SkeletonError> {
    create_root(dest_root).map_err(SkeletonError::nothing_written)?;
    let mut report = MaterializeReport {
        directories: 1,
        files: 0,
    };

    let mut created = BTreeSet::new();
    for name in template::bundled_paths() {
        let relative: PathBuf = name.split('/').collect();

        let mut parents: Vec<&Path> = relative
            .ancestors()
            .skip(1)
            .filter(|dir| !dir.as_os_str().is_empty())
            .collect();
        parents.reverse();
        for dir in parents {
            if created.insert(dir.to_path_buf()) {
                let target = dest_root.join(dir);
                fs::create_dir(&target).map_err(|e| {
                    SkeletonError::file_system(&target, "failed to create directory", e)
                })?;
                report.directories += 1;
                debug!(dir = %dir.display(), "created directory");
            }
        }

        let target = dest_root.join(&relative);
        let contents = template::bundled_contents(&name).ok_or_else(|| {
            SkeletonError::file_system_without_source(&target, "bundled template entry missing")
        })?;
        fs::write(&target, contents)
            .map_err(|e| SkeletonError::file_system(&target, "failed to create file", e))?;
        report.files += 1;
        debug!(file = %relative.display(), "wrote file");
    }

    Ok(report)
}

fn copy_tree(
    source_root: &Path,
    dest_root: &Path,
    report: &mut MaterializeReport,
) -> Result<(), SkeletonError> {
    let walker = WalkDir::new(source_root)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(source_root, e))?;
        let source = entry.path();
        let file_type = entry.file_type();

        if entry.depth() == 0 {
            if !file_type.is_dir() {
                return Err(SkeletonError::file_system_without_source(
                    source,
                    "template root is not a directory",
                ));
            }
            create_root(dest_root)?;
            report.directories += 1;
            continue;
        }

        let relative = source.strip_prefix(source_root).map_err(|_| {
            SkeletonError::file_system_without_source(source, "entry outside the template root")
        })?;
        let target = dest_root.join(relative);

        if file_type.is_dir() {
            fs::create_dir(&target).map_err(|e| {
                SkeletonError::file_system(&target, "failed to create directory", e)
            })?;
            report.directories += 1;
            debug!(dir = %relative.display(), "created directory");
        } else if file_type.is_file() {
            copy_file(source, &target)?;
            report.files += 1;
            debug!(file = %relative.display(), "copied file");
        } else {
            let kind = if file_type.is_symlink() {
                "symbolic link"
            } else {
                "special file"
            };
            warn!(path = %source.display(), kind, "unsupported template entry");
            return Err(SkeletonError::file_system_without_source(
                source,
                format!("unsupported entry kind in template ({kind})"),
            ));
        }
    }

    Ok(())
}

/// Creates the missing parents of `dest_root`, then `dest_root` itself.
/// An existing root is reported as taken rather than reused.
fn create_root(dest_root: &Path) -> Result<(), SkeletonError> {
    if let Some(parent) = dest_root.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| SkeletonError::file_system(parent, "failed to create directory", e))?;
    }
    fs::create_dir(dest_root).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            SkeletonError::target_exists(dest_root)
        } else {
            SkeletonError::file_system(dest_root, "failed to create directory", e)
        }
    })
}

/// Copies one file's bytes. The source is opened before the target is
/// created, so an unreadable source leaves nothing behind for that entry.
fn copy_file(source: &Path, target: &Path) -> Result<(), SkeletonError> {
    let mut reader = File::open(source)
        .map_err(|e| SkeletonError::file_system(source, "failed to read template file", e))?;
    let mut writer = File::create(target)
        .map_err(|e| SkeletonError::file_system(target, "failed to create file", e))?;
    io::copy(&mut reader, &mut writer)
        .map_err(|e| SkeletonError::file_system(source, "failed to copy template file", e))?;
    Ok(())
}

fn walk_error(source_root: &Path, err: walkdir::Error) -> SkeletonError {
    let path = err.path().unwrap_or(source_root).to_path_buf();
    match err.into_io_error() {
        Some(io_err) => SkeletonError::file_system(&path, "failed to read template entry", io_err),
        None => SkeletonError::file_system_without_source(&path, "filesystem loop in template"),
    }
}
