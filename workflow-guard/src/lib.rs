//! # workflow-guard
//!
//! Verifies the qwiet.ai `NextGen-Static-Analysis` GitHub Actions workflow by
//! textual markers.
//!
//! The workflow file is located under `.github/workflows`, read once, and a fixed
//! set of independent checks is applied to its raw text. Matching is textual on
//! purpose: no YAML parsing, indentation is tolerated. A repository without the
//! workflow yields skipped checks, never failed ones.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use workflow_guard::{validate, DiscoveryConfig};
//!
//! let config = DiscoveryConfig::with_root(".");
//! let report = validate(&config).unwrap();
//! println!("Workflow: {:?}", report.workflow);
//! println!("Failed checks: {}", report.failed_count());
//! println!("Skipped checks: {}", report.skipped_count());
//! println!("OK: {}", report.ok);
//! ```

mod checks;
mod config;
mod discovery;
mod error;
mod marker;
pub mod output;
mod report;
mod strategy;

pub use checks::{CheckFailure, CheckKind, CheckOutcome, DISABLED_JOB_TOKEN, NOT_FOUND_REASON};
pub use config::{DEFAULT_WORKFLOWS_DIR, DiscoveryConfig};
pub use discovery::{Discovery, DiscoveryMatch, WorkflowFile, discover_workflow};
pub use error::ScanError;
pub use marker::{Marker, MarkerKind};
pub use report::{CheckResult, ValidationReport};
pub use strategy::fs::{find_candidates, read_workflow_text};

use tracing::debug;

/// Run every check against the workflow under `config.root`.
///
/// Discovery runs exactly once; its snapshot is shared by all checks. When no
/// workflow is found every check is reported as skipped.
///
/// # Errors
///
/// Returns an error if candidate files cannot be enumerated or read.
pub fn validate(config: &DiscoveryConfig) -> Result<ValidationReport, ScanError> {
    let discovery = discover_workflow(config)?;

    let report = match &discovery.workflow {
        Some(workflow) => ValidationReport::new(
            Some(workflow.path().to_path_buf()),
            Some(workflow.matched_by()),
            discovery.candidates,
            run_checks(workflow),
        ),
        None => ValidationReport::new(
            None,
            None,
            discovery.candidates,
            skip_all(NOT_FOUND_REASON),
        ),
    }
    .with_oversized(discovery.oversized);

    debug!(
        passed = report.passed_count(),
        failed = report.failed_count(),
        skipped = report.skipped_count(),
        "validation finished"
    );
    Ok(report)
}

/// Run every check against one workflow snapshot.
#[must_use]
pub fn run_checks(workflow: &WorkflowFile) -> Vec<CheckResult> {
    CheckKind::ALL
        .into_iter()
        .map(|kind| {
            let outcome = kind.run(workflow.text());
            debug!(check = %kind, failed = outcome.is_failed(), "check finished");
            CheckResult::new(kind, outcome)
        })
        .collect()
}

/// Report every check as skipped for `reason`.
#[must_use]
pub fn skip_all(reason: &str) -> Vec<CheckResult> {
    CheckKind::ALL
        .into_iter()
        .map(|kind| {
            CheckResult::new(
                kind,
                CheckOutcome::Skipped {
                    reason: reason.to_owned(),
                },
            )
        })
        .collect()
}
