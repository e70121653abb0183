//! Directory resolution and repository root detection

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::config::GIT_MARKER_DIR;

/// Why a path could not be resolved to a directory
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("cannot open {}: {source}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot compute absolute path of {}: {source}", path.display())]
    PathError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A directory validated at resolution time, identified by its canonical path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DirectoryRef {
    name: String,
    path: PathBuf,
}

impl DirectoryRef {
    /// Base name of the path as given to [`resolve`]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical absolute path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when `<path>/.git` resolves to a directory
    pub fn is_repository_root(&self) -> bool {
        resolve(self.path.join(GIT_MARKER_DIR)).is_ok()
    }

    /// Converts into a [`RepositoryRoot`] if the directory carries the git marker
    pub fn into_repository_root(self) -> Option<RepositoryRoot> {
        if self.is_repository_root() {
            Some(RepositoryRoot { path: self.path })
        } else {
            None
        }
    }
}

impl fmt::Display for DirectoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Canonical path of a directory whose immediate `.git` child is a directory
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryRoot {
    path: PathBuf,
}

impl RepositoryRoot {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_dir(&self) -> PathBuf {
        self.path.join(GIT_MARKER_DIR)
    }
}

impl fmt::Display for RepositoryRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Validates that `path` is an existing directory and returns its canonical identity
///
/// Symlinks are followed: a link to a directory resolves to the target's canonical path.
pub fn resolve(path: impl AsRef<Path>) -> Result<DirectoryRef, ResolveError> {
    let path = path.as_ref();

    let metadata = fs::metadata(path).map_err(|source| ResolveError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;

    if !metadata.is_dir() {
        return Err(ResolveError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let canonical = fs::canonicalize(path).map_err(|source| ResolveError::PathError {
        path: path.to_path_buf(),
        source,
    })?;

    let name = path
        .file_name()
        .or_else(|| canonical.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| canonical.display().to_string());

    Ok(DirectoryRef {
        name,
        path: canonical,
    })
}
