//! Working-tree status and the clean/dirty verdict

use std::path::Path;
use thiserror::Error;

use super::error::EvaluationError;
use super::exclude::{is_excluded, IgnorePattern};
use crate::core::resolve;

const UNTRACKED_CODE: char = '?';

/// Verdict for one repository, produced exactly once
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusVerdict {
    /// No tracked modifications and no untracked files outside the ignore rules
    Clean,
    /// At least one tracked modification or visible untracked file
    Dirty,
    /// Evaluation stopped before a verdict could be reached
    Error(EvaluationError),
}

impl StatusVerdict {
    pub fn from_status(status: &StatusSet) -> Self {
        if status.is_clean() {
            StatusVerdict::Clean
        } else {
            StatusVerdict::Dirty
        }
    }

    /// Returns the text representation of this verdict
    pub fn text(&self) -> &str {
        match self {
            StatusVerdict::Clean => "Clean",
            StatusVerdict::Dirty => "Dirty",
            StatusVerdict::Error(_) => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StatusVerdict::Error(_))
    }
}

/// One entry of `git status --porcelain=v1`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStatus {
    /// Path relative to the working-tree root
    pub path: String,
    /// Index (staging area) status code
    pub index: char,
    /// Working-tree status code
    pub worktree: char,
    /// Source path of a rename or copy
    pub original_path: Option<String>,
}

impl FileStatus {
    pub fn is_untracked(&self) -> bool {
        self.index == UNTRACKED_CODE && self.worktree == UNTRACKED_CODE
    }

    fn untracked(path: String) -> Self {
        Self {
            path,
            index: UNTRACKED_CODE,
            worktree: UNTRACKED_CODE,
            original_path: None,
        }
    }

    // Untracked directories (nested repositories) are listed with a trailing slash
    fn is_excluded_by(&self, patterns: &[IgnorePattern]) -> bool {
        let is_dir = self.path.ends_with('/');
        is_excluded(patterns, Path::new(self.path.trim_end_matches('/')), is_dir)
    }

    fn is_nested_repository(&self, root: &Path) -> bool {
        self.path.ends_with('/')
            && resolve(root.join(self.path.trim_end_matches('/')))
                .map(|dir| dir.is_repository_root())
                .unwrap_or(false)
    }

    fn is_rename_or_copy(&self) -> bool {
        matches!(self.index, 'R' | 'C') || matches!(self.worktree, 'R' | 'C')
    }
}

#[derive(Debug, Error)]
#[error("malformed status entry: {0:?}")]
pub struct MalformedStatusEntry(pub String);

/// Every path whose working-tree state differs from the last commit
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSet {
    entries: Vec<FileStatus>,
}

impl StatusSet {
    pub fn new(entries: Vec<FileStatus>) -> Self {
        Self { entries }
    }

    /// Parses NUL-separated `git status --porcelain=v1 -z` output
    ///
    /// Each record is `XY <path>`; renames and copies carry the source path as the next field.
    pub fn parse_porcelain(output: &[u8]) -> Result<Self, MalformedStatusEntry> {
        let mut entries = Vec::new();
        let mut fields = output.split(|b| *b == 0).filter(|field| !field.is_empty());

        while let Some(field) = fields.next() {
            if field.len() < 4 || field[2] != b' ' {
                return Err(MalformedStatusEntry(
                    String::from_utf8_lossy(field).into_owned(),
                ));
            }

            let mut entry = FileStatus {
                path: String::from_utf8_lossy(&field[3..]).into_owned(),
                index: field[0] as char,
                worktree: field[1] as char,
                original_path: None,
            };
            if entry.is_rename_or_copy() {
                entry.original_path = fields
                    .next()
                    .map(|source| String::from_utf8_lossy(source).into_owned());
            }
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    /// Parses NUL-separated `git ls-files --others -z` output into untracked entries
    pub fn parse_untracked(output: &[u8]) -> Self {
        let entries = output
            .split(|b| *b == 0)
            .filter(|field| !field.is_empty())
            .map(|field| FileStatus::untracked(String::from_utf8_lossy(field).into_owned()))
            .collect();
        Self { entries }
    }

    /// Appends the entries of `other`
    pub fn merged(mut self, other: StatusSet) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FileStatus] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops untracked directories under `root` that are repositories of their own
    ///
    /// Discovery reports those separately and never descends into them.
    pub fn without_nested_repositories(self, root: &Path) -> Self {
        let entries = self
            .entries
            .into_iter()
            .filter(|entry| !(entry.is_untracked() && entry.is_nested_repository(root)))
            .collect();

        Self { entries }
    }

    /// Drops untracked entries matched by `patterns`
    ///
    /// Tracked changes are kept regardless: ignore rules never apply to tracked files.
    pub fn without_excluded(self, patterns: &[IgnorePattern]) -> Self {
        if patterns.is_empty() {
            return self;
        }

        let entries = self
            .entries
            .into_iter()
            .filter(|entry| !(entry.is_untracked() && entry.is_excluded_by(patterns)))
            .collect();

        Self { entries }
    }
}
