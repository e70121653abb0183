//! Repository and working-tree handles backed by the git executable

use std::path::{Path, PathBuf};

use super::error::EvaluationError;
use super::exclude::IgnorePattern;
use super::operations::run_git;
use super::status::StatusSet;

// Git command arguments
const GIT_ABSOLUTE_GIT_DIR_ARGS: &[&str] = &["rev-parse", "--absolute-git-dir"];
const GIT_CONFIG_BARE_ARGS: &[&str] = &["config", "--bool", "--get", "core.bare"];
// Tracked changes only; untracked files are listed separately so that
// `.git/info/exclude` is applied through `Worktree::excludes` rather than by git
const GIT_TRACKED_STATUS_ARGS: &[&str] = &[
    "status",
    "--porcelain=v1",
    "-z",
    "--untracked-files=no",
    "--ignore-submodules=none",
];
const GIT_UNTRACKED_FILES_ARGS: &[&str] = &[
    "ls-files",
    "-z",
    "--others",
    "--exclude-per-directory=.gitignore",
];
const GIT_EXCLUDES_FILE_ARGS: &[&str] = &["config", "--path", "--get", "core.excludesFile"];

/// An opened repository, owned by the task that opened it
#[derive(Debug)]
pub struct GitRepository {
    root: PathBuf,
    git_dir: PathBuf,
}

impl GitRepository {
    /// Opens the repository whose `.git` directory sits directly under `root`
    pub async fn open(root: &Path) -> Result<Self, EvaluationError> {
        let open_error = |message: String| EvaluationError::Open {
            path: root.to_path_buf(),
            message,
        };

        let output = run_git(root, GIT_ABSOLUTE_GIT_DIR_ARGS)
            .await
            .map_err(|e| open_error(e.to_string()))?;

        if !output.success {
            return Err(open_error(output.error_message()));
        }

        Ok(Self {
            root: root.to_path_buf(),
            git_dir: PathBuf::from(output.stdout_text()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Working-tree view of the repository; bare repositories have none
    pub async fn worktree(&self) -> Result<Worktree, EvaluationError> {
        let worktree_error = |message: String| EvaluationError::Worktree {
            path: self.root.clone(),
            message,
        };

        let output = run_git(&self.root, GIT_CONFIG_BARE_ARGS)
            .await
            .map_err(|e| worktree_error(e.to_string()))?;

        // `git config --get` exits non-zero with empty stderr when the key is unset
        if !output.success && !output.stderr.is_empty() {
            return Err(worktree_error(output.error_message()));
        }
        if output.success && output.stdout_text() == "true" {
            return Err(worktree_error("repository is bare".to_string()));
        }

        Ok(Worktree::new(self.root.clone()))
    }
}

/// Mutable working-tree view: status plus extra ignore patterns
#[derive(Debug)]
pub struct Worktree {
    root: PathBuf,
    /// Extra ignore patterns, applied after git's own rules; later entries take precedence
    pub excludes: Vec<IgnorePattern>,
}

impl Worktree {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self {
            root,
            excludes: Vec::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Computes working-tree status
    ///
    /// Tracked changes come from `git status`. Untracked files come from `git ls-files`
    /// with only `.gitignore` files and `core.excludesFile` applied; the repository's
    /// exclude file takes effect through [`Worktree::excludes`]. Nested repositories
    /// are not untracked content.
    pub async fn status(&self) -> Result<StatusSet, EvaluationError> {
        let tracked = self.run_status_step(GIT_TRACKED_STATUS_ARGS).await?;
        let tracked =
            StatusSet::parse_porcelain(&tracked).map_err(|e| self.status_error(e.to_string()))?;

        let mut untracked_args: Vec<&str> = GIT_UNTRACKED_FILES_ARGS.to_vec();
        let exclude_from = self
            .global_excludes_file()
            .await
            .map(|path| format!("--exclude-from={path}"));
        if let Some(arg) = &exclude_from {
            untracked_args.push(arg.as_str());
        }
        let untracked = self.run_status_step(&untracked_args).await?;

        let untracked = StatusSet::parse_untracked(&untracked)
            .without_nested_repositories(&self.root)
            .without_excluded(&self.excludes);

        Ok(tracked.merged(untracked))
    }

    async fn run_status_step(&self, args: &[&str]) -> Result<Vec<u8>, EvaluationError> {
        let output = run_git(&self.root, args)
            .await
            .map_err(|e| self.status_error(e.to_string()))?;

        if !output.success {
            return Err(self.status_error(output.error_message()));
        }
        Ok(output.stdout)
    }

    // Only passed to git when it is a readable file; git aborts on anything else
    async fn global_excludes_file(&self) -> Option<String> {
        let output = run_git(&self.root, GIT_EXCLUDES_FILE_ARGS).await.ok()?;
        let path = output.stdout_text();
        (output.success && Path::new(&path).is_file()).then_some(path)
    }

    fn status_error(&self, message: String) -> EvaluationError {
        EvaluationError::Status {
            path: self.root.clone(),
            message,
        }
    }
}
