//! Benford's Law first-digit conformity analysis.
//!
//! Raw delimited text becomes a [`table::RawTable`], a column of it becomes a
//! validated [`sample::NumericSample`], and [`analyzer::analyze`] turns that
//! sample into an [`analyzer::AnalysisResult`]. Every call is independent.

pub mod analyzer;
pub mod digits;
pub mod error;
pub mod reference;
pub mod sample;
pub mod table;
pub mod thresholds;
pub mod types;

pub use analyzer::{analyze, analyze_column, AnalysisResult, FitStatistics, Verdict};
pub use error::BenfordError;
pub use sample::NumericSample;
pub use table::{ColumnSelector, RawTable};
pub use types::*;

/// Standard result type for all benford operations
pub type BenfordResult<T> = Result<T, BenfordError>;
