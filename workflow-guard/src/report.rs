//! Validation report types.

use std::path::PathBuf;

use serde::Serialize;

use crate::checks::{CheckKind, CheckOutcome};
use crate::discovery::DiscoveryMatch;

/// Result of one check within a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct CheckResult {
    /// Which check this is.
    pub check: CheckKind,
    /// Human-readable check title.
    pub title: &'static str,
    /// Pass, fail or skip, with details.
    #[serde(flatten)]
    pub outcome: CheckOutcome,
}

impl CheckResult {
    /// Pair an outcome with its check, filling in the title.
    #[must_use]
    pub fn new(check: CheckKind, outcome: CheckOutcome) -> Self {
        Self {
            check,
            title: check.title(),
            outcome,
        }
    }
}

/// Result of a validation run.
///
/// Skipped checks are not failures: a repository without the workflow is `ok`.
/// CI pipelines that require the workflow to exist should check
/// [`ValidationReport::workflow`] as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct ValidationReport {
    /// The workflow that was checked, if one was discovered.
    pub workflow: Option<PathBuf>,
    /// Which discovery rule selected the workflow.
    pub matched_by: Option<DiscoveryMatch>,
    /// Number of candidate workflow files enumerated during discovery.
    pub candidates: usize,
    /// Candidates skipped during discovery for exceeding the size limit.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub oversized: Vec<PathBuf>,
    /// Whether no check failed.
    pub ok: bool,
    /// One entry per check, in [`CheckKind::ALL`] order.
    pub checks: Vec<CheckResult>,
}

impl ValidationReport {
    pub(crate) fn new(
        workflow: Option<PathBuf>,
        matched_by: Option<DiscoveryMatch>,
        candidates: usize,
        checks: Vec<CheckResult>,
    ) -> Self {
        let ok = !checks.iter().any(|c| c.outcome.is_failed());
        Self {
            workflow,
            matched_by,
            candidates,
            oversized: Vec::new(),
            ok,
            checks,
        }
    }

    pub(crate) fn with_oversized(mut self, oversized: Vec<PathBuf>) -> Self {
        self.oversized = oversized;
        self
    }

    /// Number of checks that passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.outcome.is_passed()).count()
    }

    /// Number of checks that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.outcome.is_failed()).count()
    }

    /// Number of checks that were skipped.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.checks.iter().filter(|c| c.outcome.is_skipped()).count()
    }

    /// Look up the result of a specific check.
    #[must_use]
    pub fn result(&self, check: CheckKind) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.check == check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckFailure;

    fn failed() -> CheckOutcome {
        CheckOutcome::Failed {
            failures: vec![CheckFailure {
                pattern: "x",
                message: "missing x".to_owned(),
            }],
        }
    }

    #[test]
    fn test_ok_ignores_skips() {
        let report = ValidationReport::new(
            None,
            None,
            0,
            vec![
                CheckResult::new(
                    CheckKind::Triggers,
                    CheckOutcome::Skipped {
                        reason: "none".to_owned(),
                    },
                ),
                CheckResult::new(CheckKind::Steps, CheckOutcome::Passed),
            ],
        );
        assert!(report.ok);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 0);
    }

    #[test]
    fn test_any_failure_clears_ok() {
        let report = ValidationReport::new(
            Some(PathBuf::from("wf.yml")),
            Some(DiscoveryMatch::NameAndJob),
            1,
            vec![
                CheckResult::new(CheckKind::Triggers, CheckOutcome::Passed),
                CheckResult::new(CheckKind::Environment, failed()),
            ],
        );
        assert!(!report.ok);
        assert_eq!(report.failed_count(), 1);
        assert!(report.result(CheckKind::Environment).unwrap().outcome.is_failed());
        assert!(report.result(CheckKind::Steps).is_none());
    }

    #[test]
    fn test_oversized_only_serialized_when_present() {
        let report = ValidationReport::new(None, None, 1, vec![]);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("oversized").is_none());

        let report = report.with_oversized(vec![PathBuf::from("big.yml")]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["oversized"][0], "big.yml");
        assert!(report.ok);
    }

    #[test]
    fn test_check_result_serializes_flat() {
        let json = serde_json::to_value(CheckResult::new(CheckKind::CommandFlags, failed())).unwrap();
        assert_eq!(json["check"], "command-flags");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["failures"][0]["message"], "missing x");
    }
}
