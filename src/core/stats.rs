//! Statistics tracking for a scan

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::git::StatusVerdict;

/// Lock-free verdict counters shared by every evaluation task
#[derive(Debug, Default)]
pub struct ScanStatistics {
    clean_repos: AtomicU64,
    dirty_repos: AtomicU64,
    error_repos: AtomicU64,
}

/// Point-in-time copy of [`ScanStatistics`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub clean: u64,
    pub dirty: u64,
    pub errors: u64,
}

impl ScanSummary {
    /// Number of verdicts reported
    pub fn total(&self) -> u64 {
        self.clean + self.dirty + self.errors
    }

    /// One-line summary for the closing log message
    pub fn describe(&self, duration: Duration) -> String {
        let mut line = format!(
            "Checked {} repositories in {:.1}s • {} clean • {} dirty",
            self.total(),
            duration.as_secs_f64(),
            self.clean,
            self.dirty
        );
        if self.errors > 0 {
            line.push_str(&format!(" • {} failed", self.errors));
        }
        line
    }
}

impl ScanStatistics {
    /// Creates a new statistics tracker with all counters initialized to zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, verdict: &StatusVerdict) {
        let counter = match verdict {
            StatusVerdict::Clean => &self.clean_repos,
            StatusVerdict::Dirty => &self.dirty_repos,
            StatusVerdict::Error(_) => &self.error_repos,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ScanSummary {
        ScanSummary {
            clean: self.clean_repos.load(Ordering::Relaxed),
            dirty: self.dirty_repos.load(Ordering::Relaxed),
            errors: self.error_repos.load(Ordering::Relaxed),
        }
    }
}
