//! Public API for git operations.
//!
//! This module provides the stable public API for git-related functionality:
//! - Opening a repository and its working tree
//! - Repository-local exclude patterns
//! - Working-tree status and the clean/dirty verdict
//!
//! ## Example: Checking one repository
//!
//! ```rust,no_run
//! use git_dirs::core::ExcludePolicy;
//! use git_dirs::git::{evaluate_repository, StatusVerdict};
//! use std::path::Path;
//!
//! async fn check(path: &Path) {
//!     if evaluate_repository(path, ExcludePolicy::Lenient).await == StatusVerdict::Dirty {
//!         println!("Repository has changes");
//!     }
//! }
//! ```

// Per-repository pipeline
pub use super::operations::{evaluate_repository, run_git, GitOutput};

// Handles
pub use super::repository::{GitRepository, Worktree};

// Exclude patterns
pub use super::exclude::{
    exclude_file_path, is_excluded, parse_exclude_lines, read_exclude_file, IgnorePattern,
    PatternMatch,
};

// Status
pub use super::error::EvaluationError;
pub use super::status::{FileStatus, MalformedStatusEntry, StatusSet, StatusVerdict};
