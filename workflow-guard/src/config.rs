//! Configuration types for workflow discovery.
//!
//! The checks themselves are fixed; only where and how workflow files are
//! looked up is configurable.

use std::path::PathBuf;

/// Conventional location of GitHub Actions workflow definitions, relative to the repository root.
pub const DEFAULT_WORKFLOWS_DIR: &str = ".github/workflows";

/// Filesystem options for locating the workflow under test.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct DiscoveryConfig {
    /// Repository root (default: current working directory).
    pub root: PathBuf,
    /// Workflows directory, relative to `root` unless absolute.
    pub workflows_dir: PathBuf,
    /// Exclude patterns (glob format), matched against the full path or the file name.
    pub exclude: Vec<String>,
    /// Maximum file size in bytes (default: 10 MB).
    pub max_file_size: u64,
    /// Whether to follow symbolic links (default: `false`).
    pub follow_links: bool,
    /// Maximum directory traversal depth below the workflows directory (default: 64).
    pub max_depth: usize,
}

impl DiscoveryConfig {
    /// Create a config rooted at `root` with default settings otherwise.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Directory that is walked for candidate workflow files.
    #[must_use]
    pub fn workflows_path(&self) -> PathBuf {
        self.root.join(&self.workflows_dir)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            workflows_dir: PathBuf::from(DEFAULT_WORKFLOWS_DIR),
            exclude: Vec::new(),
            max_file_size: 10_485_760,
            follow_links: false,
            max_depth: 64,
        }
    }
}
