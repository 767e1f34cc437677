//! Shared output formatting for validation reports.
//!
//! Provides JSON and plain-text formatters for `ValidationReport`.
//! Color/terminal formatting is intentionally excluded from this core module —
//! that concern belongs to the CLI layer.

use std::io::Write;
use std::path::Path;

use crate::checks::CheckOutcome;
use crate::discovery::DiscoveryMatch;
use crate::report::ValidationReport;

/// Format a `ValidationReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Status label for one outcome, as used in the plain-text report.
#[must_use]
pub fn status_label(outcome: &CheckOutcome) -> &'static str {
    match outcome {
        CheckOutcome::Passed => "PASS",
        CheckOutcome::Failed { .. } => "FAIL",
        CheckOutcome::Skipped { .. } => "SKIP",
    }
}

/// Format a `ValidationReport` as human-readable plain text to a writer.
///
/// Color/ANSI formatting is the responsibility of the caller (CLI layer).
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer, "  WORKFLOW GUARD")?;
    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(writer)?;
    writeln!(writer, "  Candidates:     {}", report.candidates)?;
    match &report.workflow {
        Some(path) => {
            writeln!(writer, "  Workflow:       {}", path.display())?;
            if report.matched_by == Some(DiscoveryMatch::JobOnly) {
                writeln!(
                    writer,
                    "  Matched by:     job token only (top-level name differs)"
                )?;
            }
        }
        None => writeln!(writer, "  Workflow:       (not found)")?,
    }
    for path in &report.oversized {
        writeln!(writer, "  Oversized:      {} (skipped)", path.display())?;
    }
    writeln!(writer)?;

    writeln!(writer, "{}", "-".repeat(80))?;
    writeln!(writer, "  CHECKS")?;
    writeln!(writer, "{}", "-".repeat(80))?;
    for result in &report.checks {
        writeln!(
            writer,
            "[{}] {}: {}",
            status_label(&result.outcome),
            result.check,
            result.title
        )?;
        match &result.outcome {
            CheckOutcome::Passed => {}
            CheckOutcome::Failed { failures } => {
                for failure in failures {
                    writeln!(writer, "    - {} [{}]", failure.message, failure.pattern)?;
                }
            }
            CheckOutcome::Skipped { reason } => writeln!(writer, "    {reason}")?,
        }
    }
    writeln!(writer)?;

    writeln!(writer, "{}", "=".repeat(80))?;
    writeln!(
        writer,
        "  {} passed, {} failed, {} skipped",
        report.passed_count(),
        report.failed_count(),
        report.skipped_count()
    )?;
    writeln!(writer, "{}", "=".repeat(80))?;

    Ok(())
}

/// Write candidate workflow paths, one per line.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_candidates(candidates: &[impl AsRef<Path>], writer: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(writer, "Candidate workflow files:")?;
    for path in candidates {
        writeln!(writer, " - {}", path.as_ref().display())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::{CheckFailure, CheckKind, NOT_FOUND_REASON};
    use crate::report::CheckResult;
    use std::path::PathBuf;

    fn render(report: &ValidationReport) -> String {
        let mut buf = Vec::new();
        write_human(report, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_human_output_lists_failures_with_patterns() {
        let report = ValidationReport::new(
            Some(PathBuf::from(".github/workflows/qwiet.yml")),
            Some(DiscoveryMatch::JobOnly),
            3,
            vec![
                CheckResult::new(CheckKind::Triggers, CheckOutcome::Passed),
                CheckResult::new(
                    CheckKind::WorkflowName,
                    CheckOutcome::Failed {
                        failures: vec![CheckFailure {
                            pattern: "name",
                            message: "Workflow top-level name should be 'qwiet.ai'".to_owned(),
                        }],
                    },
                ),
            ],
        );
        let out = render(&report);
        assert!(out.contains("Workflow:       .github/workflows/qwiet.yml"));
        assert!(out.contains("job token only"));
        assert!(out.contains("[PASS] triggers"));
        assert!(out.contains("[FAIL] workflow-name"));
        assert!(out.contains("- Workflow top-level name should be 'qwiet.ai' [name]"));
        assert!(out.contains("1 passed, 1 failed, 0 skipped"));
    }

    #[test]
    fn test_human_output_for_missing_workflow() {
        let report = ValidationReport::new(
            None,
            None,
            0,
            vec![CheckResult::new(
                CheckKind::Steps,
                CheckOutcome::Skipped {
                    reason: NOT_FOUND_REASON.to_owned(),
                },
            )],
        );
        let out = render(&report);
        assert!(out.contains("(not found)"));
        assert!(out.contains("[SKIP] steps"));
        assert!(out.contains(NOT_FOUND_REASON));
        assert!(out.contains("0 passed, 0 failed, 1 skipped"));
    }

    #[test]
    fn test_human_output_names_oversized_candidates() {
        let report = ValidationReport::new(None, None, 1, vec![])
            .with_oversized(vec![PathBuf::from(".github/workflows/huge.yml")]);
        let out = render(&report);
        assert!(out.contains("Oversized:      .github/workflows/huge.yml (skipped)"));
    }

    #[test]
    fn test_json_output_is_parseable() {
        let report = ValidationReport::new(None, None, 0, vec![]);
        let mut buf = Vec::new();
        write_json(&report, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["ok"], true);
        assert!(value["workflow"].is_null());
    }

    #[test]
    fn test_write_candidates() {
        let mut buf = Vec::new();
        write_candidates(&[PathBuf::from("a.yml"), PathBuf::from("b.yaml")], &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert_eq!(out, "Candidate workflow files:\n - a.yml\n - b.yaml\n");
    }
}
