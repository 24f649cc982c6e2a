//! Analysis errors.

use crate::domain::CandleError;
use thiserror::Error;

/// Minimum number of candles an analysis needs.
pub const MIN_CANDLES: usize = 20;

/// Fatal, non-retryable analysis failures for one (symbol, timeframe) pair.
///
/// "No pivots", "no order block" and "no fair value gap" are not errors; they
/// surface as `None` fields on the analysis result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("not enough historical data to perform analysis: need {required} candles, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("malformed candle at index {index}: {source}")]
    DataShape {
        index: usize,
        #[source]
        source: CandleError,
    },

    #[error("candle at index {index} breaks the declared ordering")]
    OutOfOrder { index: usize },

    #[error("invalid analyzer configuration: {0}")]
    InvalidConfig(String),
}
