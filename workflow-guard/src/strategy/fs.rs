//! Filesystem source for workflow files.
//!
//! Enumerates candidate workflow definitions on disk and reads them for the
//! checks. Properties enforced here:
//! - Symlinks are skipped unless `follow_links` is set; followed links must
//!   resolve inside the repository root
//! - Device files, pipes, and sockets are skipped
//! - Maximum directory depth is enforced to prevent infinite recursion
//! - Bounded streaming reads prevent memory `DoS`
//! - A missing workflows directory yields no candidates rather than an error

use std::io::Read;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::DiscoveryConfig;
use crate::error::ScanError;

/// Check if a path matches any of the exclude patterns
fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

/// Check if file has a workflow extension (`.yml` or `.yaml`).
#[must_use]
pub fn is_workflow_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yml" | "yaml")
    )
}

fn compile_excludes(patterns: &[String]) -> Result<Vec<Pattern>, ScanError> {
    patterns
        .iter()
        .map(|pat_str| {
            Pattern::new(pat_str).map_err(|source| ScanError::InvalidExcludePattern {
                pattern: pat_str.clone(),
                source,
            })
        })
        .collect()
}

/// Directory every candidate must resolve into: the repository root, or the
/// workflows directory itself when it was configured outside the root.
fn scan_boundary(config: &DiscoveryConfig, workflows: &Path) -> Result<PathBuf, ScanError> {
    let canonicalize = |path: &Path| {
        path.canonicalize().map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })
    };
    let workflows = canonicalize(workflows)?;
    match canonicalize(&config.root) {
        Ok(root) if workflows.starts_with(&root) => Ok(root),
        _ => Ok(workflows),
    }
}

/// Find all candidate workflow files under the configured workflows directory.
///
/// The result is sorted and deduplicated so discovery order does not depend on
/// the platform's directory iteration order.
///
/// # Errors
///
/// Returns an error if an exclude pattern is invalid or the directory walk fails
/// (permission denied, symlink loop, etc.). A missing workflows directory is not
/// an error: it yields an empty list.
pub fn find_candidates(config: &DiscoveryConfig) -> Result<Vec<PathBuf>, ScanError> {
    let exclude_patterns = compile_excludes(&config.exclude)?;
    let root = config.workflows_path();

    if !root.is_dir() {
        debug!(dir = %root.display(), "workflows directory not present");
        return Ok(Vec::new());
    }

    let boundary = scan_boundary(config, &root)?;
    let mut files = Vec::new();
    for entry_result in WalkDir::new(&root)
        .follow_links(config.follow_links)
        .max_depth(config.max_depth)
    {
        let entry = entry_result.map_err(|source| ScanError::Walk {
            path: source
                .path()
                .map_or_else(|| root.clone(), Path::to_path_buf),
            source,
        })?;

        let file_path = entry.path();
        if entry.path_is_symlink() && !config.follow_links {
            debug!(file = %file_path.display(), "skipping symlink");
            continue;
        }
        if !file_path.is_file() {
            continue;
        }

        match file_path.canonicalize() {
            Ok(resolved) if resolved.starts_with(&boundary) => {}
            Ok(resolved) => {
                warn!(
                    file = %file_path.display(),
                    resolved = %resolved.display(),
                    "skipping candidate that resolves outside the repository root"
                );
                continue;
            }
            Err(e) => {
                warn!(file = %file_path.display(), error = %e, "failed to resolve candidate path");
                continue;
            }
        }

        // Skip devices, pipes, sockets — only regular files
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if let Ok(ft) = entry.metadata().map(|m| m.file_type())
                && (ft.is_block_device() || ft.is_char_device() || ft.is_fifo() || ft.is_socket())
            {
                continue;
            }
        }

        if !is_workflow_file(file_path) || matches_exclude(file_path, &exclude_patterns) {
            continue;
        }

        files.push(file_path.to_path_buf());
    }

    files.sort();
    files.dedup();
    debug!(dir = %root.display(), count = files.len(), "enumerated workflow candidates");
    Ok(files)
}

/// Read a workflow file as text using a bounded streaming read.
///
/// Decoding is strict UTF-8 first; content that is not valid UTF-8 falls back to
/// lossy decoding so a stray byte does not hide the whole workflow from the checks.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, or if it exceeds
/// `max_file_size`.
pub fn read_workflow_text(path: &Path, max_file_size: u64) -> Result<String, ScanError> {
    let io_err = |source: std::io::Error| ScanError::Io {
        path: path.to_owned(),
        source,
    };

    let file = std::fs::File::open(path).map_err(io_err)?;

    // Read at most max_file_size + 1 bytes to detect oversized files
    let mut buffer = Vec::new();
    file.take(max_file_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(io_err)?;

    if buffer.len() as u64 > max_file_size {
        return Err(ScanError::FileTooLarge {
            path: path.to_owned(),
            limit: max_file_size,
        });
    }

    match String::from_utf8(buffer) {
        Ok(content) => Ok(content),
        Err(err) => {
            warn!(file = %path.display(), "file is not valid UTF-8, decoding lossily");
            Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workflows_dir(tmp: &TempDir) -> PathBuf {
        let dir = tmp.path().join(".github").join("workflows");
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_workflows_dir_yields_no_candidates() {
        let tmp = TempDir::new().unwrap();
        let config = DiscoveryConfig::with_root(tmp.path());
        assert!(find_candidates(&config).unwrap().is_empty());
    }

    #[test]
    fn test_only_yaml_extensions_are_candidates() {
        let tmp = TempDir::new().unwrap();
        let dir = workflows_dir(&tmp);
        fs::write(dir.join("a.yml"), "name: a\n").unwrap();
        fs::write(dir.join("b.yaml"), "name: b\n").unwrap();
        fs::write(dir.join("c.json"), "{}").unwrap();
        fs::write(dir.join("README.md"), "# flows").unwrap();

        let config = DiscoveryConfig::with_root(tmp.path());
        let files = find_candidates(&config).unwrap();
        assert_eq!(files, vec![dir.join("a.yml"), dir.join("b.yaml")]);
    }

    #[test]
    fn test_candidates_are_found_recursively_and_sorted() {
        let tmp = TempDir::new().unwrap();
        let dir = workflows_dir(&tmp);
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("z.yml"), "").unwrap();
        fs::write(dir.join("m.yml"), "").unwrap();

        let config = DiscoveryConfig::with_root(tmp.path());
        let files = find_candidates(&config).unwrap();
        assert_eq!(files, vec![dir.join("m.yml"), dir.join("nested").join("z.yml")]);
    }

    #[test]
    fn test_exclude_by_file_name() {
        let tmp = TempDir::new().unwrap();
        let dir = workflows_dir(&tmp);
        fs::write(dir.join("keep.yml"), "").unwrap();
        fs::write(dir.join("skip.yml"), "").unwrap();

        let mut config = DiscoveryConfig::with_root(tmp.path());
        config.exclude = vec!["skip.*".to_owned()];
        let files = find_candidates(&config).unwrap();
        assert_eq!(files, vec![dir.join("keep.yml")]);
    }

    #[test]
    fn test_invalid_exclude_pattern_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut config = DiscoveryConfig::with_root(tmp.path());
        config.exclude = vec!["***".to_owned()];
        let err = find_candidates(&config).unwrap_err();
        assert!(matches!(err, ScanError::InvalidExcludePattern { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped_by_default() {
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("secret.yml");
        fs::write(&target, "name: qwiet.ai\n").unwrap();

        let tmp = TempDir::new().unwrap();
        let dir = workflows_dir(&tmp);
        fs::write(dir.join("real.yml"), "").unwrap();
        std::os::unix::fs::symlink(&target, dir.join("linked.yml")).unwrap();
        std::os::unix::fs::symlink(dir.join("real.yml"), dir.join("alias.yml")).unwrap();

        let config = DiscoveryConfig::with_root(tmp.path());
        assert_eq!(find_candidates(&config).unwrap(), vec![dir.join("real.yml")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_followed_symlinks_must_stay_inside_root() {
        let outside = TempDir::new().unwrap();
        let target = outside.path().join("secret.yml");
        fs::write(&target, "name: qwiet.ai\n").unwrap();

        let tmp = TempDir::new().unwrap();
        let dir = workflows_dir(&tmp);
        fs::write(dir.join("real.yml"), "").unwrap();
        std::os::unix::fs::symlink(&target, dir.join("linked.yml")).unwrap();
        std::os::unix::fs::symlink(dir.join("real.yml"), dir.join("alias.yml")).unwrap();

        let mut config = DiscoveryConfig::with_root(tmp.path());
        config.follow_links = true;
        assert_eq!(
            find_candidates(&config).unwrap(),
            vec![dir.join("alias.yml"), dir.join("real.yml")]
        );
    }

    #[test]
    fn test_max_depth_limits_recursion() {
        let tmp = TempDir::new().unwrap();
        let dir = workflows_dir(&tmp);
        fs::create_dir_all(dir.join("nested")).unwrap();
        fs::write(dir.join("nested").join("deep.yml"), "").unwrap();
        fs::write(dir.join("top.yml"), "").unwrap();

        let mut config = DiscoveryConfig::with_root(tmp.path());
        config.max_depth = 1;
        assert_eq!(find_candidates(&config).unwrap(), vec![dir.join("top.yml")]);
    }

    #[test]
    fn test_read_utf8_text() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wf.yml");
        fs::write(&path, "name: qwiet.ai\n").unwrap();
        assert_eq!(read_workflow_text(&path, 1024).unwrap(), "name: qwiet.ai\n");
    }

    #[test]
    fn test_read_falls_back_on_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wf.yml");
        fs::write(&path, b"name: qwiet.ai\n# caf\xe9\n").unwrap();
        let text = read_workflow_text(&path, 1024).unwrap();
        assert!(text.starts_with("name: qwiet.ai\n"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_rejects_oversized_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wf.yml");
        fs::write(&path, "x".repeat(32)).unwrap();
        let err = read_workflow_text(&path, 16).unwrap_err();
        assert!(matches!(err, ScanError::FileTooLarge { limit: 16, .. }));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_workflow_text(&tmp.path().join("absent.yml"), 1024).unwrap_err();
        assert!(matches!(err, ScanError::Io { .. }));
    }
}
