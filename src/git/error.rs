//! Per-repository evaluation errors

use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failure that stops evaluation of one repository without affecting any other
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("cannot open repository {}: {message}", path.display())]
    Open { path: PathBuf, message: String },

    #[error("cannot get worktree of {}: {message}", path.display())]
    Worktree { path: PathBuf, message: String },

    #[error("cannot read exclude file of {}: {message}", path.display())]
    Exclude { path: PathBuf, message: String },

    #[error("cannot compute status of {}: {message}", path.display())]
    Status { path: PathBuf, message: String },

    /// The task evaluating the repository did not finish (panicked or was cancelled)
    #[error("status check of {} aborted: {message}", path.display())]
    Aborted { path: PathBuf, message: String },
}

impl EvaluationError {
    /// Repository the error belongs to
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. }
            | Self::Worktree { path, .. }
            | Self::Exclude { path, .. }
            | Self::Status { path, .. }
            | Self::Aborted { path, .. } => path,
        }
    }

    /// Short name of the stage that failed
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Open { .. } => "open-failed",
            Self::Worktree { .. } => "worktree-failed",
            Self::Exclude { .. } => "exclude-failed",
            Self::Status { .. } => "status-failed",
            Self::Aborted { .. } => "aborted",
        }
    }
}
