//! Concurrent status evaluation of discovered repositories
//!
//! Each root pulled off the discovery channel gets its own tokio task. A semaphore caps
//! how many of them run git at once, and every task reports its own verdict to the sink
//! as soon as it has one. The evaluator only joins the tasks at the end.

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Semaphore;
use tracing::{debug, error};

use super::cancel::Cancellation;
use super::config::{ExcludePolicy, ScanOptions};
use super::discovery::spawn_discovery;
use super::resolver::{DirectoryRef, RepositoryRoot};
use super::stats::{ScanStatistics, ScanSummary};
use crate::git::{evaluate_repository, EvaluationError, StatusVerdict};

/// Receives each verdict as soon as it is known
///
/// Called concurrently from many tasks, in no particular order.
pub trait VerdictSink: Send + Sync {
    fn report(&self, root: &RepositoryRoot, verdict: &StatusVerdict);
}

impl<F> VerdictSink for F
where
    F: Fn(&RepositoryRoot, &StatusVerdict) + Send + Sync,
{
    fn report(&self, root: &RepositoryRoot, verdict: &StatusVerdict) {
        self(root, verdict)
    }
}

/// Drains `receiver`, evaluating every root with at most `options.concurrency` checks at once
///
/// Returns after the channel is closed and every spawned check has reported. Once
/// `cancellation` is set no further roots are taken; roots already taken but not yet
/// started are reported as aborted.
pub async fn evaluate(
    mut receiver: UnboundedReceiver<RepositoryRoot>,
    options: &ScanOptions,
    sink: Arc<dyn VerdictSink>,
    cancellation: &Cancellation,
) -> ScanSummary {
    let semaphore = Arc::new(Semaphore::new(options.concurrency.max(1)));
    let statistics = Arc::new(ScanStatistics::new());
    let mut tasks = FuturesUnordered::new();

    while let Some(root) = receiver.recv().await {
        if cancellation.is_cancelled() {
            debug!("scan cancelled, not taking further repositories");
            break;
        }

        tasks.push(tokio::spawn(evaluate_and_report(
            root,
            options.exclude_policy,
            Arc::clone(&semaphore),
            Arc::clone(&sink),
            Arc::clone(&statistics),
            cancellation.clone(),
        )));
    }

    // Join barrier
    while let Some(joined) = tasks.next().await {
        if let Err(err) = joined {
            error!(error = %err, "status task did not complete");
        }
    }

    statistics.snapshot()
}

async fn evaluate_and_report(
    root: RepositoryRoot,
    policy: ExcludePolicy,
    semaphore: Arc<Semaphore>,
    sink: Arc<dyn VerdictSink>,
    statistics: Arc<ScanStatistics>,
    cancellation: Cancellation,
) {
    let verdict = match semaphore.acquire().await {
        Ok(_permit) if cancellation.is_cancelled() => aborted(&root, "scan cancelled".to_string()),
        Ok(_permit) => {
            match AssertUnwindSafe(evaluate_repository(root.path(), policy))
                .catch_unwind()
                .await
            {
                Ok(verdict) => verdict,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(repo = %root, panic = %message, "status check panicked");
                    aborted(&root, message)
                }
            }
        }
        Err(err) => aborted(&root, format!("semaphore error: {err}")),
    };

    statistics.record(&verdict);
    sink.report(&root, &verdict);
}

fn aborted(root: &RepositoryRoot, message: String) -> StatusVerdict {
    StatusVerdict::Error(EvaluationError::Aborted {
        path: root.path().to_path_buf(),
        message,
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "status check panicked".to_string()
    }
}

/// Discovers and evaluates every repository under `root`
///
/// The walk runs on a blocking thread and feeds [`evaluate`] through the discovery channel.
pub async fn scan_directory(
    root: DirectoryRef,
    options: &ScanOptions,
    sink: Arc<dyn VerdictSink>,
    cancellation: &Cancellation,
) -> Result<ScanSummary> {
    let root_path = root.path().to_path_buf();

    let (receiver, walk) = spawn_discovery(root, options.walk.clone(), cancellation.clone());
    let summary = evaluate(receiver, options, sink, cancellation).await;
    let discovered = walk.await?;

    debug!(
        root = %root_path.display(),
        discovered,
        reported = summary.total(),
        "scan complete"
    );

    Ok(summary)
}
