//! Configuration constants and settings

// Concurrency Configuration
//
// Status checks spawn `git status` per repository: mostly I/O-bound with some hashing,
// so a little more than one job per core keeps the disk busy without thrashing it.

/// Upper bound on the default number of concurrent status checks
pub const STATUS_CONCURRENT_CAP: usize = 12;

/// Environment variable consulted when no `--jobs`/`--sequential` flag is given
pub const CONCURRENCY_ENV_VAR: &str = "GIT_DIRS_CONCURRENCY";

/// Upper bound on directory walker threads
pub const MAX_WALK_THREADS: usize = 8;

// Timeout constants
pub const GIT_OPERATION_TIMEOUT_SECS: u64 = 180; // 3 minutes per git invocation

// Repository layout
pub const GIT_MARKER_DIR: &str = ".git";
pub const EXCLUDE_FILE_PATH: &[&str] = &[GIT_MARKER_DIR, "info", "exclude"];
pub const EXCLUDE_COMMENT_PREFIX: &str = "#";

/// Determines the concurrency limit for status checks based on CLI args and system resources
///
/// Priority order:
/// 1. --sequential flag → 1
/// 2. --jobs N flag → N
/// 3. GIT_DIRS_CONCURRENCY env var → N
/// 4. Smart default → min(CPU_CORES + 2, 12)
pub fn get_status_concurrency(jobs: Option<usize>, sequential: bool) -> usize {
    if sequential {
        return 1;
    }

    if let Some(n) = jobs {
        return n.max(1); // Ensure at least 1
    }

    if let Some(n) = std::env::var(CONCURRENCY_ENV_VAR)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
    {
        return n;
    }

    default_status_concurrency()
}

fn default_status_concurrency() -> usize {
    (num_cpus::get() + 2).min(STATUS_CONCURRENT_CAP)
}

/// What to do when `.git/info/exclude` exists but cannot be read
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExcludePolicy {
    /// Log a warning and compute status without the extra patterns
    #[default]
    Lenient,
    /// Report the repository as failed
    Strict,
}

/// Directory walk settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkOptions {
    /// Maximum depth below the root; `None` walks the whole tree
    pub max_depth: Option<usize>,
    /// Descend into symlinked directories
    pub follow_links: bool,
    /// Walker threads feeding the discovery channel
    pub threads: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            follow_links: false,
            threads: num_cpus::get().min(MAX_WALK_THREADS),
        }
    }
}

/// Everything a scan needs beyond the root directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Maximum number of repositories evaluated at once
    pub concurrency: usize,
    pub walk: WalkOptions,
    pub exclude_policy: ExcludePolicy,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            concurrency: default_status_concurrency(),
            walk: WalkOptions::default(),
            exclude_policy: ExcludePolicy::default(),
        }
    }
}
