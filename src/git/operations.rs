//! Git command execution and the per-repository status check

use anyhow::Result;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use super::error::EvaluationError;
use super::exclude::read_exclude_file;
use super::repository::GitRepository;
use super::status::StatusVerdict;
use crate::core::config::{ExcludePolicy, GIT_MARKER_DIR, GIT_OPERATION_TIMEOUT_SECS};

/// Captured result of one git invocation
#[derive(Clone, Debug)]
pub struct GitOutput {
    pub success: bool,
    /// Raw stdout; porcelain formats are whitespace- and NUL-sensitive
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl GitOutput {
    /// Stdout as trimmed text
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim().to_string()
    }

    /// Best available description of a failed invocation
    pub fn error_message(&self) -> String {
        if self.stderr.is_empty() {
            "git exited with an error".to_string()
        } else {
            self.stderr.clone()
        }
    }
}

/// Runs git against the repository rooted at `root` with a timeout
///
/// The git directory and work tree are pinned to `root/.git` and `root`, so git never
/// searches parent directories for some other repository. Optional locks are disabled,
/// which keeps `git status` from rewriting the index.
pub async fn run_git(root: &Path, args: &[&str]) -> Result<GitOutput> {
    let timeout_duration = Duration::from_secs(GIT_OPERATION_TIMEOUT_SECS);

    let mut git_dir = OsString::from("--git-dir=");
    git_dir.push(root.join(GIT_MARKER_DIR));
    let mut work_tree = OsString::from("--work-tree=");
    work_tree.push(root);

    let result = tokio::time::timeout(
        timeout_duration,
        Command::new("git")
            .arg(git_dir)
            .arg(work_tree)
            .args(args)
            .current_dir(root)
            .env("GIT_OPTIONAL_LOCKS", "0")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output(),
    )
    .await;

    match result {
        Ok(Ok(output)) => Ok(GitOutput {
            success: output.status.success(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(anyhow::anyhow!(
            "Git operation timed out after {} seconds",
            GIT_OPERATION_TIMEOUT_SECS
        )),
    }
}

/// Open, apply excludes, compute status, classify
///
/// Every failure is confined to this repository and comes back as [`StatusVerdict::Error`].
pub async fn evaluate_repository(root: &Path, policy: ExcludePolicy) -> StatusVerdict {
    match check_repository(root, policy).await {
        Ok(verdict) => verdict,
        Err(err) => {
            debug!(repo = %root.display(), stage = err.stage(), error = %err, "status check failed");
            StatusVerdict::Error(err)
        }
    }
}

async fn check_repository(
    root: &Path,
    policy: ExcludePolicy,
) -> Result<StatusVerdict, EvaluationError> {
    let repo = GitRepository::open(root).await?;
    let mut worktree = repo.worktree().await?;

    match read_exclude_file(root).await {
        Ok(patterns) => {
            if !patterns.is_empty() {
                debug!(repo = %root.display(), count = patterns.len(), "applying exclude patterns");
            }
            worktree.excludes.extend(patterns);
        }
        Err(err) => match policy {
            ExcludePolicy::Lenient => {
                warn!(repo = %root.display(), error = %err, "ignoring unreadable exclude file");
            }
            ExcludePolicy::Strict => {
                return Err(EvaluationError::Exclude {
                    path: root.to_path_buf(),
                    message: err.to_string(),
                });
            }
        },
    }

    let status = worktree.status().await?;
    Ok(StatusVerdict::from_status(&status))
}
