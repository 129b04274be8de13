//! Data models for per-file and per-subroutine metrics.
//!
//! Records are produced by an external source parser and handed to this
//! tool as a batch. They are never mutated after decoding.

use serde::Deserialize;

/// Metrics for a single named subroutine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubroutineMetric {
    /// Subroutine name as reported by the parser.
    pub name: String,
    /// Path of the file declaring the subroutine.
    pub path: String,
    /// First line of the subroutine (1-indexed).
    #[serde(default = "default_start_line")]
    pub start_line: u32,
    /// Number of lines in the subroutine body.
    #[serde(default)]
    pub line_count: u32,
    /// McCabe cyclomatic complexity.
    #[serde(default)]
    pub cyclomatic_complexity: u32,
}

fn default_start_line() -> u32 {
    1
}

/// Metrics for one analyzed source file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileMetric {
    /// Path to the file.
    pub path: String,
    /// Total number of lines in the file.
    #[serde(default)]
    pub line_count: u32,
    /// Module (package) names declared in the file, in declaration order.
    #[serde(default)]
    pub module_names: Vec<String>,
    /// Subroutines declared in the file, in declaration order.
    #[serde(default)]
    pub subroutine_metrics: Vec<SubroutineMetric>,
    /// Lines of code outside any named subroutine.
    #[serde(default)]
    pub mainline_line_count: u32,
}

impl FileMetric {
    /// Number of subroutines declared in the file.
    pub fn subroutine_count(&self) -> usize {
        self.subroutine_metrics.len()
    }

    /// Number of module declarations in the file (duplicates included).
    pub fn module_count(&self) -> usize {
        self.module_names.len()
    }
}
