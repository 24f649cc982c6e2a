//! Trading signals: the output record of an analysis.
//!
//! Signals are immutable once composed. They describe a trade idea derived
//! from market structure; what a consumer does with them (display, store,
//! broadcast) is outside this crate, apart from the in-memory [`SignalLog`].

pub mod composer;
pub mod format;
pub mod log;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::Timeframe;
use crate::structure::{Bias, BreakKind, FairValueGap, OrderBlock};

pub use composer::{
    additive_confidence, compose, confidence, realized_risk_reward, stop_loss, target_ladder,
    SignalContext, MAX_CONFIDENCE,
};
pub use format::format_price;
pub use log::SignalLog;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// Direction implied by a structural bias; `None` for neutral.
    pub fn from_bias(bias: Bias) -> Option<Self> {
        match bias {
            Bias::Bullish => Some(Direction::Buy),
            Bias::Bearish => Some(Direction::Sell),
            Bias::Neutral => None,
        }
    }

    pub fn bias(&self) -> Bias {
        match self {
            Direction::Buy => Bias::Bullish,
            Direction::Sell => Bias::Bearish,
        }
    }

    /// +1 for buys, -1 for sells.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Buy => 1.0,
            Direction::Sell => -1.0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => f.write_str("BUY"),
            Direction::Sell => f.write_str("SELL"),
        }
    }
}

/// Take-profit ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    pub target1: f64,
    pub target2: f64,
    pub target3: f64,
}

impl Targets {
    pub fn as_array(&self) -> [f64; 3] {
        [self.target1, self.target2, self.target3]
    }
}

/// Content-addressed signal identity (BLAKE3 hex of the canonical JSON).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalId(pub String);

impl fmt::Display for SignalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A directional trade idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub direction: Direction,
    pub entry: f64,
    pub stop_loss: f64,
    pub targets: Targets,
    /// `None` only when a realized ratio is requested and the risk is zero.
    pub risk_reward_ratio: Option<f64>,
    pub confidence: u8,
    pub structure: BreakKind,
    pub broken_level: f64,
    pub risk_distance: f64,
    pub atr: f64,
    pub order_block: Option<OrderBlock>,
    pub fair_value_gap: Option<FairValueGap>,
    pub analysis: String,
    /// Time of the candle the signal was derived from.
    pub timestamp: NaiveDateTime,
}

impl Signal {
    pub fn id(&self) -> SignalId {
        let json = serde_json::to_string(self).expect("Signal serialization failed");
        SignalId(blake3::hash(json.as_bytes()).to_hex().to_string())
    }
}
