//! Test fixtures and builders

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::git::{create_test_commit, setup_git_repo};

/// A committed repository somewhere under a test's temp directory
pub struct TestRepo {
    pub path: PathBuf,
}

impl TestRepo {
    /// Get the path to the repository
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical path, as reported by discovery
    pub fn canonical_path(&self) -> PathBuf {
        std::fs::canonicalize(&self.path).expect("Failed to canonicalize test repo path")
    }

    /// Create or overwrite a file in the working tree
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let file_path = self.path.join(name);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }
}

/// Builder for creating test repositories at a chosen location
pub struct TestRepoBuilder {
    relative_path: PathBuf,
    files: Vec<(String, String)>,
}

impl TestRepoBuilder {
    pub fn new(relative_path: impl Into<PathBuf>) -> Self {
        Self {
            relative_path: relative_path.into(),
            files: Vec::new(),
        }
    }

    /// Adds a file to the initial commit
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((name.into(), content.into()));
        self
    }

    /// Creates the repository under `parent` with one commit
    pub fn build_in(self, parent: &Path) -> Result<TestRepo> {
        let path = parent.join(&self.relative_path);
        setup_git_repo(&path)?;

        create_test_commit(&path, "README.md", "# Test Repo", "Initial commit")?;
        for (i, (name, content)) in self.files.iter().enumerate() {
            create_test_commit(&path, name, content, &format!("Commit {}", i + 2))?;
        }

        Ok(TestRepo { path })
    }
}
