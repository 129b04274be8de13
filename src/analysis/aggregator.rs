//! Corpus-wide aggregation of file metrics.
//!
//! This module combines per-file records into a single immutable
//! [`CorpusAnalysis`] holding totals, flattened lists and summary
//! statistics for subroutine length and complexity.

use super::statistics::SummaryStatistics;
use crate::models::{FileMetric, SubroutineMetric};
use tracing::debug;

/// Totals for code outside named subroutines.
///
/// Mainline complexity is not aggregated; only line counts are summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MainlineTotals {
    pub line_count: u64,
}

/// Statistics over all subroutines in the corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubroutineStats {
    /// Over `SubroutineMetric::line_count`.
    pub sub_length: SummaryStatistics,
    /// Over `SubroutineMetric::cyclomatic_complexity`.
    pub sub_complexity: SummaryStatistics,
}

/// Immutable analysis of a batch of file records.
#[derive(Debug, Clone)]
pub struct CorpusAnalysis {
    files: Vec<FileMetric>,
    file_paths: Vec<String>,
    total_line_count: u64,
    module_names: Vec<String>,
    subroutine_metrics: Vec<SubroutineMetric>,
    mainline_totals: MainlineTotals,
    summary_stats: SubroutineStats,
}

/// Analyze a batch of file records in a single pass, preserving input order.
pub fn analyze(records: Vec<FileMetric>) -> CorpusAnalysis {
    let mut file_paths = Vec::with_capacity(records.len());
    let mut total_line_count = 0u64;
    let mut module_names = Vec::new();
    let mut subroutine_metrics = Vec::new();
    let mut mainline_totals = MainlineTotals::default();

    for file in &records {
        file_paths.push(file.path.clone());
        total_line_count += u64::from(file.line_count);
        module_names.extend(file.module_names.iter().cloned());
        subroutine_metrics.extend(file.subroutine_metrics.iter().cloned());
        mainline_totals.line_count += u64::from(file.mainline_line_count);
    }

    let summary_stats = SubroutineStats {
        sub_length: SummaryStatistics::from_values(subroutine_metrics.iter().map(|s| s.line_count)),
        sub_complexity: SummaryStatistics::from_values(
            subroutine_metrics.iter().map(|s| s.cyclomatic_complexity),
        ),
    };

    debug!(
        "Analyzed {} files, {} subroutines, {} lines",
        records.len(),
        subroutine_metrics.len(),
        total_line_count
    );

    CorpusAnalysis {
        files: records,
        file_paths,
        total_line_count,
        module_names,
        subroutine_metrics,
        mainline_totals,
        summary_stats,
    }
}

impl CorpusAnalysis {
    /// The file records this analysis was built from, in input order.
    pub fn files(&self) -> &[FileMetric] {
        &self.files
    }

    pub fn file_paths(&self) -> &[String] {
        &self.file_paths
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Sum of every file's line count.
    pub fn total_line_count(&self) -> u64 {
        self.total_line_count
    }

    /// Module names of all files concatenated, duplicates kept.
    pub fn module_names(&self) -> &[String] {
        &self.module_names
    }

    /// Subroutines of all files concatenated in file order.
    pub fn subroutine_metrics(&self) -> &[SubroutineMetric] {
        &self.subroutine_metrics
    }

    pub fn mainline_totals(&self) -> MainlineTotals {
        self.mainline_totals
    }

    pub fn summary_stats(&self) -> &SubroutineStats {
        &self.summary_stats
    }
}
