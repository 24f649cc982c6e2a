//! Analysis pipeline: candles → swings → structure break → order block → FVG → signal.
//!
//! [`analyze`] is a pure function of the candle window and configuration.
//! [`SmcAnalyzer`] runs the same pipeline against a caller-owned
//! [`StructureState`] that persists between calls, for use on a live feed
//! where swings, bias and order blocks carry over from one candle to the next.
//! Each analyzer owns its state; share nothing between concurrent requests.

use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::domain::{CandleSeries, Timeframe};
use crate::error::{AnalysisError, MIN_CANDLES};
use crate::indicators::average_true_range;
use crate::signal::{compose, Signal, SignalContext};
use crate::structure::{
    classify, find_pivots, latest_fvg, prior_range, Bias, FairValueGap, OrderBlockTracker,
    StructureBreak, SwingLevel,
};

/// State carried between analysis passes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructureState {
    pub swing_high: SwingLevel,
    pub swing_low: SwingLevel,
    pub bias: Bias,
    pub order_blocks: OrderBlockTracker,
}

/// Result of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// `None` means no structural break this pass.
    pub signal: Option<Signal>,
    pub structure: Option<StructureBreak>,
    pub fair_value_gap: Option<FairValueGap>,
    /// Bias after this pass.
    pub bias: Bias,
    /// Break thresholds used this pass (swing level, or prior range when unset).
    pub upper_threshold: f64,
    pub lower_threshold: f64,
    pub atr: f64,
}

impl Analysis {
    pub const NEUTRAL_MESSAGE: &'static str =
        "No clear trading signal based on current market structure.";

    pub fn has_signal(&self) -> bool {
        self.signal.is_some()
    }
}

/// Analyzer with its own persistent structure state.
#[derive(Debug, Clone)]
pub struct SmcAnalyzer {
    config: AnalyzerConfig,
    state: StructureState,
}

impl SmcAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        config
            .validate()
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            config,
            state: StructureState::default(),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn state(&self) -> &StructureState {
        &self.state
    }

    /// Forget all carried swings, bias and order blocks.
    pub fn reset(&mut self) {
        self.state = StructureState::default();
    }

    /// Run one pass over `series` (oldest-first, latest candle last).
    pub fn analyze(
        &mut self,
        symbol: &str,
        timeframe: Timeframe,
        series: &CandleSeries,
    ) -> Result<Analysis, AnalysisError> {
        let candles = series.as_slice();
        if candles.len() < MIN_CANDLES {
            return Err(AnalysisError::InsufficientData {
                required: MIN_CANDLES,
                actual: candles.len(),
            });
        }
        let latest = &candles[candles.len() - 1];

        let pivots = find_pivots(candles, self.config.lookback);
        if let Some(high) = pivots.latest_high() {
            self.state.swing_high.promote(high.clone());
        }
        if let Some(low) = pivots.latest_low() {
            self.state.swing_low.promote(low.clone());
        }

        // Guaranteed by MIN_CANDLES and a validated range_window.
        let (range_high, range_low) =
            prior_range(candles, self.config.range_window).ok_or(AnalysisError::InsufficientData {
                required: MIN_CANDLES,
                actual: candles.len(),
            })?;
        let upper = self.state.swing_high.level().unwrap_or(range_high);
        let lower = self.state.swing_low.level().unwrap_or(range_low);

        let atr = average_true_range(candles, self.config.atr_period).unwrap_or(0.0);
        let fair_value_gap = latest_fvg(candles);
        let structure = classify(latest.close, Some(upper), Some(lower), self.state.bias);

        let signal = match structure {
            Some(brk) => {
                self.state.bias = brk.bias;
                self.state.order_blocks.record(candles, brk.bias);
                let swing_anchor = match brk.bias {
                    Bias::Bearish => upper,
                    _ => lower,
                };
                let ctx = SignalContext {
                    symbol,
                    timeframe,
                    latest,
                    structure: brk,
                    order_block: self.state.order_blocks.latest_for(brk.bias),
                    fair_value_gap,
                    atr,
                    swing_anchor,
                };
                compose(&ctx, &self.config)
            }
            None => None,
        };

        Ok(Analysis {
            signal,
            structure,
            fair_value_gap,
            bias: self.state.bias,
            upper_threshold: upper,
            lower_threshold: lower,
            atr,
        })
    }
}

/// Analyze `series` with a fresh state.
pub fn analyze(
    symbol: &str,
    timeframe: Timeframe,
    series: &CandleSeries,
    config: &AnalyzerConfig,
) -> Result<Analysis, AnalysisError> {
    SmcAnalyzer::new(config.clone())?.analyze(symbol, timeframe, series)
}
