//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Submetrics - subroutine length and complexity reports
///
/// Reads per-file metrics produced by a source parser, prints summary
/// tables and writes a SARIF document listing subroutines.
///
/// A subroutine is a violation only when it reaches BOTH the line limit
/// and the complexity limit.
///
/// Examples:
///   submetrics metrics.json
///   submetrics metrics.json --show-only-errors --max-sub-lines 80
///   parser --json src/ | submetrics - --only-machine-output > results.sarif
///   submetrics --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Metrics JSON file produced by the parser, or `-` for stdin
    #[arg(value_name = "INPUT", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .submetrics.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Line-count threshold for subroutines (default: 60)
    #[arg(long, value_name = "LINES", env = "SUBMETRICS_MAX_SUB_LINES")]
    pub max_sub_lines: Option<u32>,

    /// McCabe complexity threshold for subroutines (default: 10)
    #[arg(long, value_name = "COMPLEXITY", env = "SUBMETRICS_MAX_SUB_COMPLEXITY")]
    pub max_sub_complexity: Option<u32>,

    /// Only list subroutines that violate both thresholds
    #[arg(long)]
    pub show_only_errors: bool,

    /// Write only the SARIF document, no tables
    #[arg(long)]
    pub only_machine_output: bool,

    /// Exit with code 2 when at least one subroutine is a violation
    #[arg(long)]
    pub fail_on_violations: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .submetrics.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.max_sub_lines == Some(0) {
            return Err("--max-sub-lines must be at least 1".to_string());
        }

        if self.max_sub_complexity == Some(0) {
            return Err("--max-sub-complexity must be at least 1".to_string());
        }

        match self.input.as_deref() {
            None => return Err("An input file is required".to_string()),
            Some(path) if path.as_os_str() == "-" => {}
            Some(path) if !path.exists() => {
                return Err(format!("Input file does not exist: {}", path.display()));
            }
            Some(path) if path.is_dir() => {
                return Err(format!("Input path is a directory: {}", path.display()));
            }
            Some(_) => {}
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the merged `[general] verbose` setting; `--quiet`
    /// still wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
