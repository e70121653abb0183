//! Repository scan command implementation
//!
//! Resolves the root argument, then streams one line per discovered repository as
//! each status check finishes.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::core::{resolve, scan_directory, Cancellation, RepositoryRoot, ScanOptions, VerdictSink};
use crate::git::StatusVerdict;

const GIT_REPO_MESSAGE: &str = "it's a git repo";
const NOT_GIT_REPO_MESSAGE: &str = "not a git repo";
const EXITING_MESSAGE: &str = "Exiting";

/// Prints each verdict to stdout as a single line
pub struct ConsoleSink;

impl VerdictSink for ConsoleSink {
    fn report(&self, root: &RepositoryRoot, verdict: &StatusVerdict) {
        println!("{}", format_verdict(root, verdict));
    }
}

/// `Clean: <path>`, `Dirty: <path>` or `error: <message>`
pub fn format_verdict(root: &RepositoryRoot, verdict: &StatusVerdict) -> String {
    match verdict {
        StatusVerdict::Error(err) => format!("error: {err}"),
        StatusVerdict::Clean | StatusVerdict::Dirty => format!("{}: {}", verdict.text(), root),
    }
}

/// Handles the scan command
///
/// Fails only when `path` is not a usable directory; per-repository failures are
/// printed and the scan carries on.
pub async fn handle_scan_command(path: &Path, options: ScanOptions) -> Result<()> {
    let start_time = std::time::Instant::now();

    let root = resolve(path).context("Error opening directory")?;
    println!("{root}");

    if root.is_repository_root() {
        println!("{GIT_REPO_MESSAGE}");
    } else {
        println!("{NOT_GIT_REPO_MESSAGE}");
    }

    info!(
        root = %root,
        concurrency = options.concurrency,
        exclude_policy = ?options.exclude_policy,
        "scanning for git repositories"
    );

    let cancellation = Cancellation::new();
    let interrupt_handler = spawn_interrupt_handler(cancellation.clone());

    let summary = scan_directory(root, &options, Arc::new(ConsoleSink), &cancellation).await;
    interrupt_handler.abort();
    let summary = summary?;

    info!("{}", summary.describe(start_time.elapsed()));
    println!("{EXITING_MESSAGE}");

    Ok(())
}

/// Cancels the scan on Ctrl-C; checks already running still finish and report
fn spawn_interrupt_handler(cancellation: Cancellation) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, waiting for running status checks");
            cancellation.cancel();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::EvaluationError;
    use std::fs;
    use tempfile::TempDir;

    fn repository_root(temp_dir: &TempDir) -> RepositoryRoot {
        fs::create_dir_all(temp_dir.path().join(".git")).unwrap();
        resolve(temp_dir.path())
            .unwrap()
            .into_repository_root()
            .unwrap()
    }

    #[test]
    fn test_format_clean_and_dirty() {
        let temp_dir = TempDir::new().unwrap();
        let root = repository_root(&temp_dir);

        assert_eq!(
            format_verdict(&root, &StatusVerdict::Clean),
            format!("Clean: {}", root.path().display())
        );
        assert_eq!(
            format_verdict(&root, &StatusVerdict::Dirty),
            format!("Dirty: {}", root.path().display())
        );
    }

    #[test]
    fn test_format_error() {
        let temp_dir = TempDir::new().unwrap();
        let root = repository_root(&temp_dir);
        let verdict = StatusVerdict::Error(EvaluationError::Status {
            path: root.path().to_path_buf(),
            message: "index corrupt".to_string(),
        });

        let line = format_verdict(&root, &verdict);
        assert!(line.starts_with("error: cannot compute status of "));
        assert!(line.ends_with("index corrupt"));
    }

    #[tokio::test]
    async fn test_scan_command_rejects_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result =
            handle_scan_command(&temp_dir.path().join("missing"), ScanOptions::default()).await;

        let err = result.unwrap_err();
        assert!(format!("{err:#}").contains("Error opening directory"));
    }

    #[tokio::test]
    async fn test_scan_command_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "content").unwrap();

        assert!(handle_scan_command(&file, ScanOptions::default()).await.is_err());
    }
}
