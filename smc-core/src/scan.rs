//! Watchlist scans: analyze many (symbol, timeframe) pairs from one provider.
//!
//! Every pair gets a fresh analyzer, so no structure state leaks between
//! symbols. A failure on one pair is recorded in its outcome and the rest of
//! the scan continues.

use rayon::prelude::*;
use thiserror::Error;

use crate::analyzer::{Analysis, SmcAnalyzer};
use crate::config::AnalyzerConfig;
use crate::data::{CandleProvider, DataError};
use crate::domain::{CandleSeries, Timeframe};
use crate::error::AnalysisError;
use crate::signal::Signal;

/// One (symbol, timeframe) pair to analyze.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanRequest {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl ScanRequest {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }
}

/// Symbols crossed with timeframes.
#[derive(Debug, Clone, Default)]
pub struct Watchlist {
    pub symbols: Vec<String>,
    pub timeframes: Vec<Timeframe>,
}

impl Watchlist {
    pub fn new(symbols: Vec<String>, timeframes: Vec<Timeframe>) -> Self {
        Self {
            symbols,
            timeframes,
        }
    }

    pub fn size(&self) -> usize {
        self.symbols.len() * self.timeframes.len()
    }

    /// All pairs, symbol-major.
    pub fn requests(&self) -> Vec<ScanRequest> {
        self.symbols
            .iter()
            .flat_map(|s| self.timeframes.iter().map(|&tf| ScanRequest::new(s.clone(), tf)))
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Result for one pair.
#[derive(Debug)]
pub struct ScanOutcome {
    pub request: ScanRequest,
    pub result: Result<Analysis, ScanError>,
}

impl ScanOutcome {
    pub fn signal(&self) -> Option<&Signal> {
        self.result.as_ref().ok().and_then(|a| a.signal.as_ref())
    }
}

/// Runs watchlist scans, in parallel by default.
pub struct Scanner<'a> {
    provider: &'a dyn CandleProvider,
    config: AnalyzerConfig,
    parallel: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(provider: &'a dyn CandleProvider, config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        config
            .validate()
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            provider,
            config,
            parallel: true,
        })
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Analyze every request. Outcomes keep the order of `requests`.
    pub fn scan(&self, requests: &[ScanRequest]) -> ScanResults {
        let outcomes: Vec<ScanOutcome> = if self.parallel {
            requests.par_iter().map(|r| self.run_one(r)).collect()
        } else {
            requests.iter().map(|r| self.run_one(r)).collect()
        };

        let results = ScanResults { outcomes };
        tracing::info!(
            pairs = results.len(),
            signals = results.signals().count(),
            failures = results.failures().count(),
            "scan complete"
        );
        results
    }

    fn run_one(&self, request: &ScanRequest) -> ScanOutcome {
        let result = self.analyze_one(request);
        if let Err(e) = &result {
            tracing::warn!(
                symbol = %request.symbol,
                timeframe = %request.timeframe,
                error = %e,
                "scan pair failed"
            );
        }
        ScanOutcome {
            request: request.clone(),
            result,
        }
    }

    fn analyze_one(&self, request: &ScanRequest) -> Result<Analysis, ScanError> {
        let fetched = self.provider.fetch(&request.symbol, request.timeframe)?;
        let series = CandleSeries::new(fetched.candles, fetched.order)?;
        let mut analyzer = SmcAnalyzer::new(self.config.clone())?;
        Ok(analyzer.analyze(&request.symbol, request.timeframe, &series)?)
    }
}

/// Outcomes of one scan.
#[derive(Debug, Default)]
pub struct ScanResults {
    outcomes: Vec<ScanOutcome>,
}

impl ScanResults {
    pub fn outcomes(&self) -> &[ScanOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Signals in request order.
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.outcomes.iter().filter_map(|o| o.signal())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&ScanRequest, &ScanError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.request, e)))
    }
}
