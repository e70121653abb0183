//! Repository discovery
//!
//! Walks a directory tree and emits every repository root into a channel, pruning the
//! subtree below each root so nested repositories are never reported.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ignore::{DirEntry, WalkBuilder, WalkState};
use std::path::PathBuf;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use super::cancel::Cancellation;
use super::config::WalkOptions;
use super::resolver::{resolve, DirectoryRef, RepositoryRoot, ResolveError};

// Pre-allocation hint for the emitted-path set
const ESTIMATED_REPO_COUNT: usize = 50;

/// Walks the tree under `root`, sending each repository root to `sender`
///
/// Blocks until the walk is exhausted, cancelled, or the receiving side is dropped.
/// The sender is dropped when this returns, which closes the channel.
/// Returns the number of distinct roots found.
pub fn discover(
    root: &DirectoryRef,
    options: &WalkOptions,
    sender: UnboundedSender<RepositoryRoot>,
    cancellation: &Cancellation,
) -> usize {
    // Keyed by canonical path: with symlinks followed the same repository can be reached twice
    let emitted: DashMap<PathBuf, ()> = DashMap::with_capacity(ESTIMATED_REPO_COUNT);

    let walker = WalkBuilder::new(root.path())
        .standard_filters(false) // Hidden and gitignored directories may hold repositories too
        .follow_links(options.follow_links)
        .max_depth(options.max_depth)
        .threads(options.threads.max(1))
        .build_parallel();

    walker.run(|| {
        let sender = sender.clone();
        let emitted = &emitted;
        Box::new(move |entry| visit_entry(entry, &sender, emitted, cancellation))
    });

    let found = emitted.len();
    debug!(root = %root, found, "directory walk finished");
    found
}

fn visit_entry(
    entry: Result<DirEntry, ignore::Error>,
    sender: &UnboundedSender<RepositoryRoot>,
    emitted: &DashMap<PathBuf, ()>,
    cancellation: &Cancellation,
) -> WalkState {
    if cancellation.is_cancelled() {
        return WalkState::Quit;
    }

    let entry = match entry {
        Ok(entry) => entry,
        Err(err) => {
            debug!(error = %err, "skipping unreadable entry");
            return WalkState::Continue;
        }
    };

    // Plain files can never be repository roots
    if entry.file_type().is_some_and(|ft| ft.is_file()) {
        return WalkState::Continue;
    }

    let dir = match resolve(entry.path()) {
        Ok(dir) => dir,
        Err(ResolveError::NotADirectory { .. }) => return WalkState::Continue,
        Err(err) => {
            debug!(error = %err, "pruning entry");
            return WalkState::Skip;
        }
    };

    let Some(repo) = dir.into_repository_root() else {
        trace!(path = %entry.path().display(), "descending");
        return WalkState::Continue;
    };

    if let Entry::Vacant(slot) = emitted.entry(repo.path().to_path_buf()) {
        slot.insert(());
        debug!(repo = %repo, "discovered repository");
        if sender.send(repo).is_err() {
            // Nobody is listening anymore
            return WalkState::Quit;
        }
    }

    // Don't descend into a repository
    WalkState::Skip
}

/// Runs [`discover`] on a blocking thread and hands back the receiving end of the channel
///
/// The join handle yields the number of roots found once the walk completes.
pub fn spawn_discovery(
    root: DirectoryRef,
    options: WalkOptions,
    cancellation: Cancellation,
) -> (UnboundedReceiver<RepositoryRoot>, JoinHandle<usize>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let handle =
        tokio::task::spawn_blocking(move || discover(&root, &options, sender, &cancellation));
    (receiver, handle)
}

/// Collects every repository root under `root`, sorted by path
///
/// Convenience wrapper around [`discover`] for callers that want the whole list at once.
pub fn find_repositories(root: &DirectoryRef, options: &WalkOptions) -> Vec<RepositoryRoot> {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    discover(root, options, sender, &Cancellation::new());

    let mut repos = Vec::new();
    while let Ok(repo) = receiver.try_recv() {
        repos.push(repo);
    }
    repos.sort();
    repos
}
