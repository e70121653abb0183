//! # git-dirs
//!
//! `git-dirs` finds every git repository below a directory and reports whether each
//! working tree is clean or dirty. It powers the `git-dirs` CLI tool.
//!
//! ## Pipeline
//!
//! - **Resolve**: the root argument is validated and canonicalized.
//! - **Discover**: a parallel directory walk streams repository roots into a channel,
//!   never descending into a repository it has already reported.
//! - **Evaluate**: each root is checked on its own task, bounded by a semaphore.
//!   Untracked files matched by `.git/info/exclude` do not make a repository dirty.
//!
//! ## Example
//!
//! ```rust,no_run
//! use git_dirs::core::{find_repositories, resolve, WalkOptions};
//!
//! fn main() -> anyhow::Result<()> {
//!     let root = resolve(".")?;
//!     for repo in find_repositories(&root, &WalkOptions::default()) {
//!         println!("{repo}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod core;
pub mod git;
pub mod utils;
