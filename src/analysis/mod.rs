//! Analysis modules.
//!
//! Decoding of upstream metric records and aggregation into corpus-wide
//! totals and statistics.

pub mod aggregator;
pub mod input;
pub mod statistics;

pub use aggregator::{analyze, CorpusAnalysis};
pub use input::load_records;
pub use statistics::SummaryStatistics;
