//! Report generation modules.

pub mod generator;
pub mod sarif;
pub mod table;

pub use generator::{RenderOptions, ReportOutcome, ReportRenderer};
