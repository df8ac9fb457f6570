// File: crates/sparkline-core/src/error.rs
// Summary: Error type for series validation and option parsing.

use thiserror::Error;

/// Errors raised while building a chart. Rendering itself never fails: a
/// backend without a surface simply paints nothing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SparklineError {
    #[error("{chart} charts do not support stacked values (index {index})")]
    StackedNotSupported { chart: &'static str, index: usize },

    #[error("invalid value {raw:?} at index {index}")]
    InvalidValue { index: usize, raw: String },

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid range key: {0}")]
    InvalidRangeKey(String),

    #[error("gradient needs at least one stop")]
    EmptyGradient,
}

pub type Result<T> = std::result::Result<T, SparklineError>;
