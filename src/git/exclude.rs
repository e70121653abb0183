//! Repository-local exclude patterns (`.git/info/exclude`)

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::Match;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::config::{EXCLUDE_COMMENT_PREFIX, EXCLUDE_FILE_PATH};

/// Outcome of testing one path against one pattern
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternMatch {
    None,
    /// The pattern ignores the path
    Exclude,
    /// A negated (`!`) pattern re-includes the path
    Include,
}

/// One gitignore-syntax line compiled into a matcher
#[derive(Clone, Debug)]
pub struct IgnorePattern {
    line: String,
    matcher: Gitignore,
}

impl IgnorePattern {
    /// Compiles a single line of gitignore syntax
    pub fn parse(line: &str) -> Result<Self, ignore::Error> {
        let mut builder = GitignoreBuilder::new(".");
        builder.add_line(None, line)?;
        let matcher = builder.build()?;
        Ok(Self {
            line: line.to_string(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// Tests `path`, relative to the working-tree root, and each of its parent directories
    pub fn matched(&self, path: &Path, is_dir: bool) -> PatternMatch {
        if path.has_root() {
            return PatternMatch::None;
        }
        match self.matcher.matched_path_or_any_parents(path, is_dir) {
            Match::None => PatternMatch::None,
            Match::Ignore(_) => PatternMatch::Exclude,
            Match::Whitelist(_) => PatternMatch::Include,
        }
    }

    /// True when this pattern on its own would ignore `path`
    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        self.matched(path, is_dir) == PatternMatch::Exclude
    }
}

/// Applies `patterns` in order with last-match-wins semantics
pub fn is_excluded(patterns: &[IgnorePattern], path: &Path, is_dir: bool) -> bool {
    patterns
        .iter()
        .rev()
        .find_map(|pattern| match pattern.matched(path, is_dir) {
            PatternMatch::None => None,
            PatternMatch::Exclude => Some(true),
            PatternMatch::Include => Some(false),
        })
        .unwrap_or(false)
}

/// Location of the exclude file for the repository rooted at `root`
pub fn exclude_file_path(root: &Path) -> PathBuf {
    EXCLUDE_FILE_PATH
        .iter()
        .fold(root.to_path_buf(), |path, part| path.join(part))
}

/// Parses exclude-file text, keeping file order
///
/// Comment lines and blank lines are skipped; lines that do not compile are logged and skipped.
pub fn parse_exclude_lines(content: &str) -> Vec<IgnorePattern> {
    content
        .lines()
        .filter(|line| !line.starts_with(EXCLUDE_COMMENT_PREFIX) && !line.trim().is_empty())
        .filter_map(|line| match IgnorePattern::parse(line) {
            Ok(pattern) => Some(pattern),
            Err(err) => {
                warn!(pattern = line, error = %err, "skipping invalid exclude pattern");
                None
            }
        })
        .collect()
}

/// Reads `.git/info/exclude` under `root`
///
/// A missing file yields no patterns; any other I/O failure is returned to the caller.
pub async fn read_exclude_file(root: &Path) -> io::Result<Vec<IgnorePattern>> {
    match tokio::fs::read(exclude_file_path(root)).await {
        Ok(bytes) => Ok(parse_exclude_lines(&String::from_utf8_lossy(&bytes))),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn patterns(lines: &[&str]) -> Vec<IgnorePattern> {
        lines.iter().map(|l| IgnorePattern::parse(l).unwrap()).collect()
    }

    #[test]
    fn test_pattern_matches_file_name_anywhere() {
        let pattern = IgnorePattern::parse("*.log").unwrap();
        assert!(pattern.matches(Path::new("debug.log"), false));
        assert!(pattern.matches(Path::new("logs/app/debug.log"), false));
        assert!(!pattern.matches(Path::new("debug.txt"), false));
        assert_eq!(pattern.as_str(), "*.log");
    }

    #[test]
    fn test_directory_pattern_matches_files_below_it() {
        let pattern = IgnorePattern::parse("build/").unwrap();
        assert!(pattern.matches(Path::new("build/out.o"), false));
        assert!(pattern.matches(Path::new("build"), true));
        assert!(!pattern.matches(Path::new("build"), false));
    }

    #[test]
    fn test_anchored_pattern_only_matches_at_root() {
        let pattern = IgnorePattern::parse("/scratch.txt").unwrap();
        assert!(pattern.matches(Path::new("scratch.txt"), false));
        assert!(!pattern.matches(Path::new("nested/scratch.txt"), false));
    }

    #[test]
    fn test_negated_pattern_reports_include() {
        let pattern = IgnorePattern::parse("!keep.log").unwrap();
        assert_eq!(
            pattern.matched(Path::new("keep.log"), false),
            PatternMatch::Include
        );
        assert!(!pattern.matches(Path::new("keep.log"), false));
    }

    #[test]
    fn test_absolute_path_never_matches() {
        let pattern = IgnorePattern::parse("*.log").unwrap();
        assert_eq!(
            pattern.matched(Path::new("/tmp/debug.log"), false),
            PatternMatch::None
        );
    }

    #[test]
    fn test_later_patterns_override_earlier_ones() {
        let ordered = patterns(&["*.log", "!keep.log"]);
        assert!(is_excluded(&ordered, Path::new("debug.log"), false));
        assert!(!is_excluded(&ordered, Path::new("keep.log"), false));

        let reversed = patterns(&["!keep.log", "*.log"]);
        assert!(is_excluded(&reversed, Path::new("keep.log"), false));
    }

    #[test]
    fn test_no_patterns_excludes_nothing() {
        assert!(!is_excluded(&[], Path::new("anything"), false));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let content = "# generated by tooling\n\n   \n*.tmp\n  # indented is a pattern\nnotes/\r\n";
        let parsed = parse_exclude_lines(content);
        let lines: Vec<_> = parsed.iter().map(IgnorePattern::as_str).collect();
        assert_eq!(lines, vec!["*.tmp", "  # indented is a pattern", "notes/"]);
    }

    #[test]
    fn test_parse_skips_invalid_patterns() {
        let parsed = parse_exclude_lines("valid.txt\n[unclosed\nother.txt\n");
        let lines: Vec<_> = parsed.iter().map(IgnorePattern::as_str).collect();
        assert_eq!(lines, vec!["valid.txt", "other.txt"]);
    }

    #[test]
    fn test_exclude_file_path() {
        assert_eq!(
            exclude_file_path(Path::new("/repo")),
            Path::new("/repo").join(".git").join("info").join("exclude")
        );
    }

    #[tokio::test]
    async fn test_read_missing_exclude_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let patterns = read_exclude_file(temp_dir.path()).await.unwrap();
        assert!(patterns.is_empty());
    }

    #[tokio::test]
    async fn test_read_exclude_file_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let info = temp_dir.path().join(".git").join("info");
        fs::create_dir_all(&info).unwrap();
        fs::write(info.join("exclude"), "# comment\nfirst\nsecond\n!third\n").unwrap();

        let patterns = read_exclude_file(temp_dir.path()).await.unwrap();
        let lines: Vec<_> = patterns.iter().map(IgnorePattern::as_str).collect();
        assert_eq!(lines, vec!["first", "second", "!third"]);
    }

    #[tokio::test]
    async fn test_unreadable_exclude_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        // A directory where the file should be fails with something other than NotFound
        fs::create_dir_all(exclude_file_path(temp_dir.path())).unwrap();

        assert!(read_exclude_file(temp_dir.path()).await.is_err());
    }
}
