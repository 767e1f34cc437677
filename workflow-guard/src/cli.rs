use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use workflow_guard::{
    DEFAULT_WORKFLOWS_DIR, DiscoveryConfig, ValidationReport, find_candidates, output, validate,
};

use crate::logging;

/// Every check passed or was skipped.
pub const EXIT_OK: u8 = 0;
/// At least one check failed.
pub const EXIT_FAILED: u8 = 1;
/// The run could not complete (I/O, walk, or argument errors).
pub const EXIT_ERROR: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "workflow-guard",
    version,
    about = "Verify the qwiet.ai static-analysis GitHub Actions workflow"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Repository root to search.
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Workflows directory, relative to the root unless absolute.
    #[arg(long, default_value = DEFAULT_WORKFLOWS_DIR, global = true)]
    pub workflows_dir: PathBuf,

    /// Exclude files matching this glob (repeatable).
    #[arg(long = "exclude", value_name = "GLOB", global = true)]
    pub exclude: Vec<String>,

    /// Maximum size of a workflow file in bytes.
    #[arg(long, value_name = "BYTES", global = true)]
    pub max_file_size: Option<u64>,

    /// Maximum directory depth below the workflows directory.
    #[arg(long, value_name = "DEPTH", global = true)]
    pub max_depth: Option<usize>,

    /// Follow symbolic links while searching.
    #[arg(long, global = true)]
    pub follow_links: bool,
}

impl SourceArgs {
    pub fn to_config(&self) -> DiscoveryConfig {
        let mut config = DiscoveryConfig::with_root(&self.root);
        config.workflows_dir.clone_from(&self.workflows_dir);
        config.exclude.clone_from(&self.exclude);
        config.follow_links = self.follow_links;
        if let Some(max) = self.max_file_size {
            config.max_file_size = max;
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Discover the workflow and run every check (default).
    Check(CheckArgs),
    /// List candidate workflow files without checking them.
    List,
}

impl Default for Command {
    fn default() -> Self {
        Self::Check(CheckArgs::default())
    }
}

#[derive(Debug, Default, Args)]
pub struct CheckArgs {
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Parse arguments, run the selected command and map the outcome to an exit code.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = cli.source.to_config();
    match cli.command.unwrap_or_default() {
        Command::Check(args) => run_check(&config, args.format),
        Command::List => run_list(&config),
    }
}

fn run_check(config: &DiscoveryConfig, format: OutputFormat) -> Result<ExitCode> {
    let report = validate(config).with_context(|| {
        format!(
            "failed to validate workflows under {}",
            config.workflows_path().display()
        )
    })?;

    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Json => output::write_json(&report, &mut stdout)?,
        OutputFormat::Human => {
            output::write_human(&report, &mut stdout)?;
            writeln!(stdout, "{}", summary_line(&report))?;
        }
    }

    Ok(ExitCode::from(exit_code(&report)))
}

fn run_list(config: &DiscoveryConfig) -> Result<ExitCode> {
    let candidates = find_candidates(config)?;
    let mut stdout = io::stdout().lock();
    output::write_candidates(&candidates, &mut stdout)?;
    Ok(ExitCode::from(EXIT_OK))
}

fn exit_code(report: &ValidationReport) -> u8 {
    if report.ok { EXIT_OK } else { EXIT_FAILED }
}

fn summary_line(report: &ValidationReport) -> String {
    if !report.ok {
        format!("\u{2717} {} check(s) failed", report.failed_count())
            .red()
            .bold()
            .to_string()
    } else if report.workflow.is_none() {
        format!(
            "- No workflow found; {} check(s) skipped",
            report.skipped_count()
        )
        .yellow()
        .to_string()
    } else {
        format!("\u{2713} All {} checks passed", report.passed_count())
            .green()
            .to_string()
    }
}
