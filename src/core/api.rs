//! Public API for the core module.
//!
//! This module provides the stable public API for core functionality including:
//! - Directory resolution
//! - Repository discovery
//! - Concurrent status evaluation
//! - Configuration utilities
//!
//! Internal implementation details are not exposed through this API.

// Resolution
pub use super::resolver::{resolve, DirectoryRef, RepositoryRoot, ResolveError};

// Discovery
pub use super::discovery::{discover, find_repositories, spawn_discovery};

// Evaluation
pub use super::evaluator::{evaluate, scan_directory, VerdictSink};
pub use super::stats::{ScanStatistics, ScanSummary};
pub use super::cancel::Cancellation;

// Configuration
pub use super::config::{get_status_concurrency, ExcludePolicy, ScanOptions, WalkOptions};
pub use super::config::{GIT_OPERATION_TIMEOUT_SECS, STATUS_CONCURRENT_CAP};
