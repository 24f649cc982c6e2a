//! Structure classification: break of structure (BOS) vs change of character (CHoCH).
//!
//! A close beyond the current swing high or low is a structural break. If the
//! break agrees with the prevailing bias it is a continuation (BOS); otherwise
//! it is a reversal (CHoCH).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Bias;
use crate::domain::Candle;

/// Continuation or reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakKind {
    /// Break of structure: price extends the existing trend.
    #[serde(rename = "BOS")]
    Bos,
    /// Change of character: price breaks against the existing trend.
    #[serde(rename = "CHoCH")]
    Choch,
}

impl fmt::Display for BreakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakKind::Bos => f.write_str("BOS"),
            BreakKind::Choch => f.write_str("CHoCH"),
        }
    }
}

/// A confirmed structural break.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StructureBreak {
    /// New bias after the break (never `Neutral`).
    pub bias: Bias,
    pub kind: BreakKind,
    /// The swing (or range) level that was broken.
    pub level: f64,
}

impl StructureBreak {
    pub fn is_continuation(&self) -> bool {
        self.kind == BreakKind::Bos
    }
}

/// Classify the latest close against the current swing levels.
///
/// The bullish side is checked first; a close can only break one side.
/// Returns `None` when the close stays inside both levels or a side has no
/// level to compare against.
pub fn classify(
    close: f64,
    swing_high: Option<f64>,
    swing_low: Option<f64>,
    prior_bias: Bias,
) -> Option<StructureBreak> {
    let kind_for = |bias: Bias| {
        if prior_bias == bias {
            BreakKind::Bos
        } else {
            BreakKind::Choch
        }
    };

    if let Some(level) = swing_high.filter(|&level| close > level) {
        return Some(StructureBreak {
            bias: Bias::Bullish,
            kind: kind_for(Bias::Bullish),
            level,
        });
    }
    if let Some(level) = swing_low.filter(|&level| close < level) {
        return Some(StructureBreak {
            bias: Bias::Bearish,
            kind: kind_for(Bias::Bearish),
            level,
        });
    }
    None
}

/// Highest high and lowest low of the `window` candles preceding the latest one.
///
/// Used as the break threshold for a side that has no confirmed swing yet.
/// The latest candle is excluded so that it can break its own range.
pub fn prior_range(candles: &[Candle], window: usize) -> Option<(f64, f64)> {
    if window == 0 || candles.len() < 2 {
        return None;
    }
    let end = candles.len() - 1;
    let start = end.saturating_sub(window);
    let prior = &candles[start..end];

    let high = prior.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
    let low = prior.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
    Some((high, low))
}
