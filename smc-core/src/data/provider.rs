//! Candle provider trait and structured error types.
//!
//! The CandleProvider trait abstracts over data sources (file imports today,
//! a network connector later) so the analysis code never knows where candles
//! came from, and tests can substitute an in-memory provider.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Candle, CandleOrder, Timeframe};

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data found for symbol {symbol} ({timeframe})")]
    SymbolNotFound { symbol: String, timeframe: Timeframe },

    #[error("record {index} is missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("record {index} has an unparseable timestamp '{value}'")]
    BadTimestamp { index: usize, value: String },

    #[error("provider reported an error: {0}")]
    Provider(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    JsonImport,
    CsvImport,
    InMemory,
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub candles: Vec<Candle>,
    /// Ordering the provider guarantees for `candles`.
    pub order: CandleOrder,
    pub source: DataSource,
}

/// Trait for candle providers.
pub trait CandleProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the candle history for `symbol` on `timeframe`.
    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError>;
}

/// Provider backed by a fixed candle set, for tests and replay.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    entries: Vec<(String, Timeframe, Vec<Candle>)>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, timeframe: Timeframe, candles: Vec<Candle>) {
        let symbol = symbol.to_ascii_uppercase();
        self.entries
            .retain(|(s, tf, _)| !(s == &symbol && *tf == timeframe));
        self.entries.push((symbol, timeframe, candles));
    }
}

impl CandleProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        let wanted = symbol.to_ascii_uppercase();
        self.entries
            .iter()
            .find(|(s, tf, _)| s == &wanted && *tf == timeframe)
            .map(|(s, tf, candles)| FetchResult {
                symbol: s.clone(),
                timeframe: *tf,
                candles: candles.clone(),
                order: CandleOrder::Unordered,
                source: DataSource::InMemory,
            })
            .ok_or(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
                timeframe,
            })
    }
}
