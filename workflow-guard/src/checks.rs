//! The fixed set of checks run against the discovered workflow.
//!
//! Every check is a pure function of the workflow text. Checks share no state
//! and can run in any order; each one reports every marker it found missing.

use serde::Serialize;

use crate::marker::Marker;

/// Reason reported by every check when no workflow could be discovered.
pub const NOT_FOUND_REASON: &str = "No suitable GitHub Actions workflow found to validate (qwiet.ai / NextGen-Static-Analysis).";

/// Token of the optional job that must stay commented out.
pub const DISABLED_JOB_TOKEN: &str = "Build-Rules:";

static TRIGGER_MARKERS: [Marker; 3] = [
    Marker::regex(r"(?m)^\s*on:\s*$", "Missing 'on:' section"),
    Marker::regex(
        r"(?m)^\s*pull_request:\s*$",
        "Workflow should trigger on pull_request",
    ),
    Marker::regex(
        r"(?m)^\s*workflow_dispatch:\s*$",
        "Workflow should allow manual dispatch",
    ),
];

static JOB_IDENTITY_MARKERS: [Marker; 2] = [
    Marker::literal(
        "NextGen-Static-Analysis:",
        "Missing job 'NextGen-Static-Analysis'",
    ),
    Marker::regex(
        r"(?m)^\s*runs-on:\s*ubuntu-latest\s*$",
        "Job should run on ubuntu-latest",
    ),
];

static STEP_MARKERS: [Marker; 3] = [
    Marker::regex(r"uses:\s*actions/checkout@v3", "Expected actions/checkout@v3 step"),
    Marker::literal(
        "curl https://cdn.shiftleft.io/download/sl > ${GITHUB_WORKSPACE}/sl",
        "Missing CLI download curl command",
    ),
    Marker::literal("chmod a+rx ${GITHUB_WORKSPACE}/sl", "Missing chmod for CLI"),
];

static COMMAND_FLAG_MARKERS: [Marker; 6] = [
    Marker::regex(
        r"(?m)^\s*pip install -r requirements\.txt\s*$",
        "Must install Python requirements",
    ),
    Marker::regex(
        r"\$\{GITHUB_WORKSPACE\}/sl --version",
        "Expected SL CLI version check",
    ),
    Marker::regex(
        r"\$\{GITHUB_WORKSPACE\}/sl analyze --strict --wait",
        "Expected strict/wait flags for analyze",
    ),
    Marker::regex(
        r"--app\s+two-tier-flask-app",
        "Expected app name 'two-tier-flask-app'",
    ),
    Marker::regex(
        r"--tag\s+branch=\$\{\{\s*github\.head_ref\s*\}\}",
        "Expected tag branch using github.head_ref",
    ),
    Marker::regex(
        r"--pythonsrc\s+\$\((?:pwd)\)",
        "Expected --pythonsrc $(pwd)",
    ),
];

static ENVIRONMENT_MARKERS: [Marker; 4] = [
    Marker::regex(
        r"SHIFTLEFT_ACCESS_TOKEN:\s*\$\{\{\s*secrets\.SHIFTLEFT_ACCESS_TOKEN\s*\}\}",
        "SHIFTLEFT_ACCESS_TOKEN should be sourced from GitHub secrets",
    ),
    Marker::regex(
        r"SHIFTLEFT_API_HOST:\s*www\.shiftleft\.io",
        "Expected SHIFTLEFT_API_HOST=www.shiftleft.io",
    ),
    Marker::regex(
        r"SHIFTLEFT_GRPC_TELEMETRY_HOST:\s*telemetry\.shiftleft\.io:443",
        "Expected telemetry host",
    ),
    Marker::regex(
        r"SHIFTLEFT_GRPC_API_HOST:\s*api\.shiftleft\.io:443",
        "Expected gRPC API host",
    ),
];

static NO_MARKERS: [Marker; 0] = [];

static WORKFLOW_NAME_MARKERS: [Marker; 1] = [Marker::regex(
    r"(?m)^\s*name:\s*qwiet\.ai\s*$",
    "Workflow top-level name should be 'qwiet.ai'",
)];

/// Identifies one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    /// `on:` with `pull_request:` and `workflow_dispatch:` triggers.
    Triggers,
    /// The `NextGen-Static-Analysis` job and its `ubuntu-latest` runner.
    JobIdentity,
    /// Checkout action and the `sl` CLI download/chmod commands.
    Steps,
    /// Commands and flags of the static-analysis step.
    CommandFlags,
    /// `SHIFTLEFT_*` environment variable bindings.
    Environment,
    /// The optional `Build-Rules` job stays commented out.
    DisabledJobs,
    /// Top-level `name: qwiet.ai`.
    WorkflowName,
}

impl CheckKind {
    /// Every check, in reporting order.
    pub const ALL: [Self; 7] = [
        Self::Triggers,
        Self::JobIdentity,
        Self::Steps,
        Self::CommandFlags,
        Self::Environment,
        Self::DisabledJobs,
        Self::WorkflowName,
    ];

    /// Short human-readable description.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Triggers => "workflow triggers on pull_request and workflow_dispatch",
            Self::JobIdentity => "NextGen-Static-Analysis job runs on ubuntu-latest",
            Self::Steps => "checkout and ShiftLeft CLI download steps",
            Self::CommandFlags => "preZero static analysis commands and flags",
            Self::Environment => "ShiftLeft environment variables",
            Self::DisabledJobs => "optional Build-Rules job stays commented out",
            Self::WorkflowName => "top-level workflow name is qwiet.ai",
        }
    }

    /// Run this check against workflow text.
    #[must_use]
    pub fn run(self, text: &str) -> CheckOutcome {
        match self {
            Self::Triggers => check_markers(&TRIGGER_MARKERS, text),
            Self::JobIdentity => check_markers(&JOB_IDENTITY_MARKERS, text),
            Self::Steps => check_markers(&STEP_MARKERS, text),
            Self::CommandFlags => check_markers(&COMMAND_FLAG_MARKERS, text),
            Self::Environment => check_markers(&ENVIRONMENT_MARKERS, text),
            Self::DisabledJobs => check_disabled_job(DISABLED_JOB_TOKEN, text),
            Self::WorkflowName => check_markers(&WORKFLOW_NAME_MARKERS, text),
        }
    }

    /// The markers this check requires, empty for checks that are not marker based.
    #[must_use]
    pub fn markers(self) -> &'static [Marker] {
        match self {
            Self::Triggers => &TRIGGER_MARKERS,
            Self::JobIdentity => &JOB_IDENTITY_MARKERS,
            Self::Steps => &STEP_MARKERS,
            Self::CommandFlags => &COMMAND_FLAG_MARKERS,
            Self::Environment => &ENVIRONMENT_MARKERS,
            Self::DisabledJobs => &NO_MARKERS,
            Self::WorkflowName => &WORKFLOW_NAME_MARKERS,
        }
    }
}

impl std::fmt::Display for CheckKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Triggers => "triggers",
            Self::JobIdentity => "job-identity",
            Self::Steps => "steps",
            Self::CommandFlags => "command-flags",
            Self::Environment => "environment",
            Self::DisabledJobs => "disabled-jobs",
            Self::WorkflowName => "workflow-name",
        };
        f.write_str(name)
    }
}

/// One missing or forbidden pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckFailure {
    /// The pattern that was expected (or forbidden).
    pub pattern: &'static str,
    /// Human-readable description of what is wrong.
    pub message: String,
}

/// Outcome of a single check. Skipped is neither a pass nor a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Every marker of the check was found.
    Passed,
    /// At least one marker was missing or forbidden text was present.
    Failed {
        /// Every violation found, in marker order.
        failures: Vec<CheckFailure>,
    },
    /// The check did not run.
    Skipped {
        /// Why the check did not run.
        reason: String,
    },
}

impl CheckOutcome {
    /// Whether the check passed.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Whether the check failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Whether the check was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    fn from_failures(failures: Vec<CheckFailure>) -> Self {
        if failures.is_empty() {
            Self::Passed
        } else {
            Self::Failed { failures }
        }
    }
}

fn check_markers(markers: &[Marker], text: &str) -> CheckOutcome {
    let failures = markers
        .iter()
        .filter(|marker| !marker.is_present(text))
        .map(|marker| CheckFailure {
            pattern: marker.pattern(),
            message: marker.description().to_owned(),
        })
        .collect();
    CheckOutcome::from_failures(failures)
}

/// Every occurrence of `token` must sit inside a `#` comment on its line.
fn check_disabled_job(token: &'static str, text: &str) -> CheckOutcome {
    let job = token.trim_end_matches(':');
    let failures = text
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let pos = line.find(token)?;
            if line[..pos].contains('#') {
                return None;
            }
            Some(CheckFailure {
                pattern: token,
                message: format!(
                    "{job} job appears to be active on line {}; expected it to be commented out",
                    idx + 1
                ),
            })
        })
        .collect();
    CheckOutcome::from_failures(failures)
}
