//! Where the project template comes from.
//!
//! The default template is compiled into the binary, so a copied or installed
//! `skeleton` scaffolds the same tree it was built with. A directory on disk
//! can be used instead through `SKELETON_TEMPLATE_DIR`.

use std::borrow::Cow;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "template/"]
struct BundledFiles;

/// The template tree to materialize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The tree embedded at build time.
    Bundled,
    /// A template directory on disk.
    Directory(PathBuf),
}

impl TemplateSource {
    /// Anchors a relative template directory at `working_dir`.
    #[must_use]
    pub fn resolved_against(&self, working_dir: &Path) -> Self {
        match self {
            Self::Bundled => Self::Bundled,
            Self::Directory(dir) => Self::Directory(working_dir.join(dir)),
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => write!(f, "bundled template"),
            Self::Directory(dir) => write!(f, "{}", dir.display()),
        }
    }
}

/// Relative paths of every bundled file, `/`-separated and sorted.
#[must_use]
pub fn bundled_paths() -> Vec<Cow<'static, str>> {
    let mut paths: Vec<_> = BundledFiles::iter().collect();
    paths.sort();
    paths
}

/// Contents of one bundled file.
#[must_use]
pub fn bundled_contents(relative: &str) -> Option<Cow<'static, [u8]>> {
    BundledFiles::get(relative).map(|file| file.data)
}

/// Canonical form of `path`, which need not exist yet.
///
/// The nearest existing ancestor is canonicalized and the missing tail is
/// appended with `..` folded lexically.
pub(crate) fn canonicalize_nearest(path: &Path) -> PathBuf {
    for ancestor in path.ancestors() {
        let Ok(mut resolved) = ancestor.canonicalize() else {
            continue;
        };
        let tail = path.strip_prefix(ancestor).unwrap_or(Path::new(""));
        for component in tail.components() {
            match component {
                Component::ParentDir => {
                    resolved.pop();
                }
                Component::Normal(part) => resolved.push(part),
                _ => {}
            }
        }
        return resolved;
    }
    path.to_path_buf()
}
