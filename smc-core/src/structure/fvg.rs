//! Fair value gaps: three-candle imbalances.

use serde::{Deserialize, Serialize};

use super::Bias;
use crate::domain::Candle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FvgKind {
    Bullish,
    Bearish,
}

impl FvgKind {
    pub fn bias(&self) -> Bias {
        match self {
            FvgKind::Bullish => Bias::Bullish,
            FvgKind::Bearish => Bias::Bearish,
        }
    }
}

/// Price range left untraded between the first and third candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FairValueGap {
    #[serde(rename = "type")]
    pub kind: FvgKind,
    pub top: f64,
    pub bottom: f64,
}

/// Check one three-candle window, oldest first.
///
/// The middle candle sets the direction; the gap exists when the first and
/// third candle ranges do not overlap in that direction.
pub fn detect_fvg(first: &Candle, middle: &Candle, third: &Candle) -> Option<FairValueGap> {
    if middle.is_bullish() && first.high < third.low {
        Some(FairValueGap {
            kind: FvgKind::Bullish,
            top: third.low,
            bottom: first.high,
        })
    } else if middle.is_bearish() && first.low > third.high {
        Some(FairValueGap {
            kind: FvgKind::Bearish,
            top: first.low,
            bottom: third.high,
        })
    } else {
        None
    }
}

/// Gap formed by the last three candles, if any.
pub fn latest_fvg(candles: &[Candle]) -> Option<FairValueGap> {
    match candles {
        [.., first, middle, third] => detect_fvg(first, middle, third),
        _ => None,
    }
}
