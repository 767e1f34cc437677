//! Locating the workflow under test.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::DiscoveryConfig;
use crate::error::ScanError;
use crate::marker::Marker;
use crate::strategy::fs::{find_candidates, read_workflow_text};

/// Top-level `name:` the workflow is expected to carry.
pub static WORKFLOW_NAME: Marker = Marker::regex(
    r"(?m)^name:\s*qwiet\.ai\s*$",
    "Top-level workflow name 'qwiet.ai'",
);

/// Job token identifying the static-analysis workflow.
pub static JOB_TOKEN: Marker = Marker::regex(
    r"\bNextGen-Static-Analysis\b",
    "Job token 'NextGen-Static-Analysis'",
);

/// Which discovery rule selected the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMatch {
    /// Both the top-level name and the job token were found.
    NameAndJob,
    /// Only the job token was found (fallback rule).
    JobOnly,
}

/// A discovered workflow: its path and a read-once snapshot of its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowFile {
    path: PathBuf,
    text: String,
    matched_by: DiscoveryMatch,
}

impl WorkflowFile {
    /// Build a snapshot from already-read text.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>, matched_by: DiscoveryMatch) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            matched_by,
        }
    }

    /// Path of the workflow file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw text as read during discovery.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Which discovery rule selected this file.
    #[must_use]
    pub fn matched_by(&self) -> DiscoveryMatch {
        self.matched_by
    }
}

/// Result of a discovery pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Number of candidate files enumerated.
    pub candidates: usize,
    /// The selected workflow, or `None` when no candidate mentions the job token.
    pub workflow: Option<WorkflowFile>,
    /// Candidates passed over because they exceed `max_file_size`.
    pub oversized: Vec<PathBuf>,
}

/// Locate the static-analysis workflow under the configured workflows directory.
///
/// The first candidate carrying both the `name: qwiet.ai` line and the
/// `NextGen-Static-Analysis` token wins. Failing that, the first candidate that
/// mentions the job token at all is accepted. Each candidate is read at most once.
///
/// Candidates larger than `max_file_size` are not matches: they are logged,
/// listed in [`Discovery::oversized`] and the search continues.
///
/// # Errors
///
/// Returns an error if candidates cannot be enumerated or a candidate cannot be
/// read. Finding nothing is not an error.
pub fn discover_workflow(config: &DiscoveryConfig) -> Result<Discovery, ScanError> {
    let candidates = find_candidates(config)?;
    let mut fallback: Option<(PathBuf, String)> = None;
    let mut oversized = Vec::new();

    for path in &candidates {
        let text = match read_workflow_text(path, config.max_file_size) {
            Ok(text) => text,
            Err(ScanError::FileTooLarge { path, limit }) => {
                warn!(file = %path.display(), limit, "skipping oversized candidate");
                oversized.push(path);
                continue;
            }
            Err(e) => return Err(e),
        };
        let has_job = JOB_TOKEN.is_present(&text);
        let has_name = WORKFLOW_NAME.is_present(&text);
        debug!(file = %path.display(), has_name, has_job, "inspected candidate");

        if has_job && has_name {
            info!(file = %path.display(), "discovered workflow");
            return Ok(Discovery {
                candidates: candidates.len(),
                workflow: Some(WorkflowFile::new(path, text, DiscoveryMatch::NameAndJob)),
                oversized,
            });
        }
        if has_job && fallback.is_none() {
            fallback = Some((path.clone(), text));
        }
    }

    let workflow = fallback.map(|(path, text)| {
        warn!(
            file = %path.display(),
            "workflow matched by job token only; top-level name differs from 'qwiet.ai'"
        );
        WorkflowFile::new(path, text, DiscoveryMatch::JobOnly)
    });

    if workflow.is_none() {
        info!(
            candidates = candidates.len(),
            "no workflow mentions NextGen-Static-Analysis"
        );
    }

    Ok(Discovery {
        candidates: candidates.len(),
        workflow,
        oversized,
    })
}
