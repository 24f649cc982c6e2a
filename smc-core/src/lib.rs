//! SMC Core: market-structure analysis and trade signal generation.
//!
//! This crate turns a window of OHLC candles into an optional trade signal:
//! - Domain types (candles, timeframes, normalized candle series)
//! - Swing pivot detection and structure-break classification (BOS / CHoCH)
//! - Order block tracking and fair value gap detection
//! - ATR-scaled stop placement, target ladders and confidence scoring
//! - Candle loading from connector JSON and CSV files
//! - Parallel watchlist scans across symbols and timeframes
//! - Lot-size position sizing from an account risk budget
//! - A deduplicated signal log with JSONL persistence

pub mod analyzer;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod scan;
pub mod signal;
pub mod sizing;
pub mod structure;

pub use analyzer::{analyze, Analysis, SmcAnalyzer, StructureState};
pub use config::{AnalyzerConfig, ConfidenceModel, ConfigError, RiskRewardReport};
pub use domain::{Candle, CandleOrder, CandleSeries, Timeframe};
pub use error::{AnalysisError, MIN_CANDLES};
pub use scan::{ScanRequest, ScanResults, Scanner, Watchlist};
pub use signal::{Direction, Signal, SignalId, SignalLog, Targets};
pub use sizing::{lot_size, PositionSize, RiskBudget, SizingError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: analysis types can move across worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        // Domain types
        require_send::<domain::Candle>();
        require_sync::<domain::Candle>();
        require_send::<domain::CandleSeries>();
        require_sync::<domain::CandleSeries>();
        require_send::<domain::Timeframe>();
        require_sync::<domain::Timeframe>();

        // Structure types
        require_send::<structure::OrderBlockTracker>();
        require_sync::<structure::OrderBlockTracker>();
        require_send::<structure::FairValueGap>();
        require_sync::<structure::FairValueGap>();
        require_send::<structure::StructureBreak>();
        require_sync::<structure::StructureBreak>();

        // Analyzer and outputs
        require_send::<analyzer::SmcAnalyzer>();
        require_sync::<analyzer::SmcAnalyzer>();
        require_send::<analyzer::Analysis>();
        require_sync::<analyzer::Analysis>();
        require_send::<signal::Signal>();
        require_sync::<signal::Signal>();
        require_send::<signal::SignalLog>();
        require_sync::<signal::SignalLog>();
        require_send::<scan::ScanResults>();
        require_sync::<scan::ScanResults>();
        require_sync::<scan::Scanner<'static>>();

        // Errors
        require_send::<error::AnalysisError>();
        require_sync::<error::AnalysisError>();
        require_send::<data::DataError>();
        require_sync::<data::DataError>();
        require_send::<sizing::SizingError>();
        require_sync::<sizing::SizingError>();
    }

    /// Providers are usable as trait objects behind a shared reference.
    #[test]
    fn candle_provider_is_object_safe() {
        fn _takes_provider(p: &dyn data::CandleProvider) -> &str {
            p.name()
        }
        let provider = data::InMemoryProvider::new();
        assert_eq!(_takes_provider(&provider), "in_memory");
    }
}
