//! Text report and diagnostics generation.
//!
//! [`ReportRenderer`] writes human-readable summary tables to its sink and
//! feeds subroutine rows to a [`DiagnosticsEmitter`], whose document is
//! written to the same sink once at the end of [`ReportRenderer::render`].

use super::sarif::DiagnosticsEmitter;
use super::table::Table;
use crate::analysis::{CorpusAnalysis, SummaryStatistics};
use crate::config::Config;
use crate::error::ReportError;
use crate::models::{FileMetric, SubroutineMetric};
use std::io::Write;
use tracing::{debug, info};

/// Rendering options, fixed for the lifetime of a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Line-count threshold for the violation check.
    pub max_sub_lines: u32,
    /// Complexity threshold for the violation check.
    pub max_sub_complexity: u32,
    /// Drop passing rows from the subroutine tables.
    pub show_only_errors: bool,
    /// Suppress all text and write only the diagnostics document.
    pub only_machine_output: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_sub_lines: 60,
            max_sub_complexity: 10,
            show_only_errors: false,
            only_machine_output: false,
        }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            max_sub_lines: config.thresholds.max_sub_lines,
            max_sub_complexity: config.thresholds.max_sub_complexity,
            show_only_errors: config.output.show_only_errors,
            only_machine_output: config.output.only_machine_output,
        }
    }
}

impl RenderOptions {
    /// Whether a subroutine violates the thresholds.
    ///
    /// **Both** limits must be reached: a subroutine is a violation only when
    /// `line_count >= max_sub_lines` AND `cyclomatic_complexity >=
    /// max_sub_complexity`. A long but simple subroutine, or a short but
    /// complex one, passes.
    pub fn is_violation(&self, sub: &SubroutineMetric) -> bool {
        sub.line_count >= self.max_sub_lines && sub.cyclomatic_complexity >= self.max_sub_complexity
    }

    /// Whether a subroutine row belongs in the subroutine tables.
    fn is_visible(&self, sub: &SubroutineMetric) -> bool {
        !self.show_only_errors || self.is_violation(sub)
    }
}

/// Counts reported back to the caller after a full invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    /// Results written to the diagnostics document.
    pub rows_forwarded: usize,
    /// Subroutines violating the thresholds, whether or not they were shown.
    pub violations: usize,
}

/// Renders tables and diagnostics for one corpus.
pub struct ReportRenderer<W: Write> {
    options: RenderOptions,
    out: W,
    emitter: DiagnosticsEmitter,
}

impl<W: Write> ReportRenderer<W> {
    pub fn new(options: RenderOptions, out: W) -> Self {
        Self {
            options,
            out,
            emitter: DiagnosticsEmitter::new(),
        }
    }

    /// Consume the renderer and return its sink.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Run a full report: text sections followed by the diagnostics document.
    pub fn render(&mut self, analysis: &CorpusAnalysis) -> Result<ReportOutcome, ReportError> {
        self.emitter.begin_document();

        self.render_corpus_summary(analysis)?;
        self.render_file_summary(analysis)?;
        self.render_subroutine_section(analysis.files())?;

        serde_json::to_writer_pretty(&mut self.out, self.emitter.serialize()?).map_err(|e| {
            if e.is_io() {
                ReportError::Io(e.into())
            } else {
                ReportError::Serialize(e)
            }
        })?;
        writeln!(self.out)?;
        self.out.flush()?;

        let outcome = ReportOutcome {
            rows_forwarded: self.emitter.result_count(),
            violations: analysis
                .subroutine_metrics()
                .iter()
                .filter(|s| self.options.is_violation(s))
                .count(),
        };
        info!(
            "Report written: {} diagnostics, {} violations",
            outcome.rows_forwarded, outcome.violations
        );

        Ok(outcome)
    }

    /// Corpus totals and subroutine statistics.
    pub fn render_corpus_summary(&mut self, analysis: &CorpusAnalysis) -> Result<(), ReportError> {
        if self.options.only_machine_output {
            return Ok(());
        }

        writeln!(self.out, "## Summary\n")?;
        writeln!(self.out, "- Files: {}", analysis.file_paths().len())?;
        writeln!(self.out, "- Total lines: {}", analysis.total_line_count())?;
        writeln!(
            self.out,
            "- Mainline lines: {}",
            analysis.mainline_totals().line_count
        )?;
        writeln!(
            self.out,
            "- Subroutines: {}",
            analysis.subroutine_metrics().len()
        )?;
        writeln!(self.out, "- Modules: {}\n", analysis.module_names().len())?;

        let stats = analysis.summary_stats();
        let mut table = Table::new(&["metric", "min", "max", "mean", "median", "std_dev"]);
        table.add_row(statistics_row("sub_length", &stats.sub_length));
        table.add_row(statistics_row("sub_complexity", &stats.sub_complexity));
        writeln!(self.out, "{}", table.render())?;

        Ok(())
    }

    /// One row per file: path, mainline lines, subroutine and module counts.
    pub fn render_file_summary(&mut self, analysis: &CorpusAnalysis) -> Result<(), ReportError> {
        if self.options.only_machine_output {
            return Ok(());
        }

        writeln!(self.out, "## Files\n")?;

        if analysis.file_count() == 0 {
            return Ok(());
        }

        let mut table = Table::new(&["path", "loc", "subs", "packages"]);
        for file in analysis.files() {
            table.add_row(vec![
                file.path.clone(),
                file.mainline_line_count.to_string(),
                file.subroutine_count().to_string(),
                file.module_count().to_string(),
            ]);
        }
        writeln!(self.out, "{}", table.render())?;

        Ok(())
    }

    /// Per-file subroutine tables.
    ///
    /// Every row kept for a table is also recorded in the diagnostics
    /// document, in table order. Without `show_only_errors` that is every
    /// subroutine, passing or not.
    pub fn render_subroutine_section(&mut self, files: &[FileMetric]) -> Result<(), ReportError> {
        if !self.options.only_machine_output {
            writeln!(self.out, "## Subroutines\n")?;
        }

        for file in files {
            let rows: Vec<&SubroutineMetric> = file
                .subroutine_metrics
                .iter()
                .filter(|s| self.options.is_visible(s))
                .collect();

            if rows.is_empty() {
                debug!("No subroutine rows to show for {}", file.path);
                continue;
            }

            let mut table = Table::new(&["method", "loc", "line_number", "mccabe_complexity"]);
            for sub in rows {
                table.add_row(vec![
                    sub.name.clone(),
                    sub.line_count.to_string(),
                    sub.start_line.to_string(),
                    sub.cyclomatic_complexity.to_string(),
                ]);
                self.emitter.record_violation(sub)?;
            }

            if !self.options.only_machine_output {
                writeln!(self.out, "### {}\n", file.path)?;
                writeln!(self.out, "{}", table.render())?;
            }
        }

        Ok(())
    }
}

fn statistics_row(label: &str, stats: &SummaryStatistics) -> Vec<String> {
    vec![
        label.to_string(),
        format_count(stats.min),
        format_count(stats.max),
        format_decimal(stats.mean),
        format_decimal(stats.median),
        format_decimal(stats.standard_deviation),
    ]
}

fn format_count(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn format_decimal(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| "-".to_string())
}
