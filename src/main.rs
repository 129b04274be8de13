//! Submetrics - subroutine metrics reporter
//!
//! A CLI tool that turns per-file, per-subroutine metrics produced by a
//! source parser into summary tables and a SARIF diagnostics document.
//!
//! Exit codes:
//!   0 - Success (or violations found without --fail-on-violations)
//!   1 - Runtime error (bad input, config, write failure, etc.)
//!   2 - Violations found with --fail-on-violations

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use models::FileMetric;
use report::{RenderOptions, ReportOutcome, ReportRenderer};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration first so its verbosity setting reaches the logger
    let (mut config, source) = match load_config(&args, Path::new(".")) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(args.log_level(config.general.verbose));

    debug!("Submetrics v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    report_config_source(&source);

    match run(&args, &config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .submetrics.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging at the given level.
///
/// Logs go to stderr; stdout is the report sink.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete report workflow. Returns exit code (0 or 2).
fn run(args: &Args, config: &Config) -> Result<i32> {
    config.validate()?;

    let input = args.input.clone().unwrap_or_else(|| "-".into());
    info!("Reading metrics from {}", input.display());
    let records = analysis::load_records(&input)?;

    let options = RenderOptions::from(config);
    debug!("Render options: {:?}", options);

    let outcome = match args.output {
        Some(ref path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let outcome = write_report(records, options, BufWriter::new(file))
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
            outcome
        }
        None => write_report(records, options, std::io::stdout().lock())
            .context("Failed to write report to stdout")?,
    };

    Ok(exit_code(&outcome, args.fail_on_violations))
}

/// Exit code for a finished report: 2 when violations should fail the run.
fn exit_code(outcome: &ReportOutcome, fail_on_violations: bool) -> i32 {
    if fail_on_violations && outcome.violations > 0 {
        warn!(
            "{} subroutines exceed both thresholds. Failing (exit code 2).",
            outcome.violations
        );
        return 2;
    }

    0
}

/// Aggregate the records and render the full report into `out`.
fn write_report<W: Write>(
    records: Vec<FileMetric>,
    options: RenderOptions,
    out: W,
) -> Result<ReportOutcome> {
    let corpus = analysis::analyze(records);
    let mut renderer = ReportRenderer::new(options, out);
    Ok(renderer.render(&corpus)?)
}

/// Where the effective configuration came from.
///
/// Loading happens before logging is installed, so the outcome is reported
/// afterwards by [`report_config_source`].
#[derive(Debug)]
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Defaults,
    /// The default file exists but could not be loaded.
    Fallback(anyhow::Error),
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` must load; a broken default file in `dir` falls
/// back to defaults.
fn load_config(args: &Args, dir: &Path) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_from_dir(dir) {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Defaults)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}

fn report_config_source(source: &ConfigSource) {
    match source {
        ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
        ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
        ConfigSource::Defaults => debug!("No config file found, using defaults"),
        ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}, using defaults", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const SAMPLE: &str = include_str!("../fixtures/sample_metrics.json");

    fn sample_records() -> Vec<FileMetric> {
        analysis::input::parse_records(SAMPLE, "sample_metrics.json").unwrap()
    }

    #[test]
    fn test_sample_report_end_to_end() {
        let mut out = Vec::new();
        let outcome = write_report(sample_records(), RenderOptions::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("## Summary"));
        assert!(text.contains("- Files: 3"));
        assert!(text.contains("## Files"));
        assert!(text.contains("### lib/Parser.pm"));
        assert!(!text.contains("### bin/run.pl"));

        // every subroutine is forwarded when not filtering
        assert_eq!(outcome.rows_forwarded, 5);
        assert_eq!(outcome.violations, 1);
    }

    #[test]
    fn test_sample_machine_output_only_violations() {
        let options = RenderOptions {
            show_only_errors: true,
            only_machine_output: true,
            ..RenderOptions::default()
        };
        let mut out = Vec::new();
        let outcome = write_report(sample_records(), options, &mut out).unwrap();

        let doc: Value = serde_json::from_slice(&out).unwrap();
        let results = doc["runs"][0]["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["message"]["arguments"][1], "parse_expression");
        assert_eq!(
            results[0]["locations"][0]["physicalLocation"]["artifactLocation"]["uri"],
            "file://lib/Parser.pm"
        );
        assert_eq!(outcome.rows_forwarded, 1);
    }

    #[test]
    fn test_sample_report_is_deterministic() {
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_report(sample_records(), RenderOptions::default(), &mut first).unwrap();
        write_report(sample_records(), RenderOptions::default(), &mut second).unwrap();
        assert_eq!(first, second);
    }

    fn make_args() -> Args {
        Args {
            input: Some(PathBuf::from("-")),
            output: None,
            config: None,
            max_sub_lines: None,
            max_sub_complexity: None,
            show_only_errors: false,
            only_machine_output: false,
            fail_on_violations: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_exit_code_fails_only_when_requested() {
        let clean = ReportOutcome {
            rows_forwarded: 4,
            violations: 0,
        };
        let failing = ReportOutcome {
            rows_forwarded: 4,
            violations: 2,
        };

        assert_eq!(exit_code(&clean, true), 0);
        assert_eq!(exit_code(&failing, false), 0);
        assert_eq!(exit_code(&failing, true), 2);
    }

    #[test]
    fn test_sample_violations_fail_the_run() {
        let mut out = Vec::new();
        let outcome = write_report(sample_records(), RenderOptions::default(), &mut out).unwrap();
        assert_eq!(exit_code(&outcome, true), 2);
    }

    #[test]
    fn test_broken_default_config_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[thresholds\nmax_sub_lines =").unwrap();

        let (config, source) = load_config(&make_args(), dir.path()).unwrap();

        assert!(matches!(source, ConfigSource::Fallback(_)));
        assert_eq!(config.thresholds.max_sub_lines, 60);
        assert_eq!(config.thresholds.max_sub_complexity, 10);
    }

    #[test]
    fn test_broken_explicit_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let mut args = make_args();
        args.config = Some(path);
        assert!(load_config(&args, dir.path()).is_err());
    }

    #[test]
    fn test_default_config_file_is_used() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[general]\nverbose = true\n\n[thresholds]\nmax_sub_lines = 80\n",
        )
        .unwrap();

        let (mut config, source) = load_config(&make_args(), dir.path()).unwrap();
        config.merge_with_args(&make_args());

        assert!(matches!(source, ConfigSource::DefaultFile));
        assert_eq!(config.thresholds.max_sub_lines, 80);
        assert_eq!(make_args().log_level(config.general.verbose), tracing::Level::DEBUG);
    }

    #[test]
    fn test_non_array_input_fails_before_output() {
        let err = analysis::input::parse_records(r#"{"files": []}"#, "inline").unwrap_err();
        assert!(matches!(err, error::InputError::NotASequence { .. }));
    }
}
