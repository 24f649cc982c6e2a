//! Market structure: swings, breaks, order blocks, fair value gaps.
//!
//! Every function here reads an oldest-first candle slice (see
//! [`CandleSeries`](crate::domain::CandleSeries)) and never looks at
//! anything but prices: no configuration lookups, no logging, no I/O.

pub mod classifier;
pub mod fvg;
pub mod order_blocks;
pub mod pivots;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use classifier::{classify, prior_range, BreakKind, StructureBreak};
pub use fvg::{detect_fvg, latest_fvg, FairValueGap, FvgKind};
pub use order_blocks::{find_order_block, OrderBlock, OrderBlockTracker, MAX_ORDER_BLOCKS};
pub use pivots::{find_pivots, Pivots, SwingPoint};

/// Prevailing structural trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bias {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl Bias {
    pub fn is_directional(&self) -> bool {
        !matches!(self, Bias::Neutral)
    }
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bias::Bullish => f.write_str("BULLISH"),
            Bias::Bearish => f.write_str("BEARISH"),
            Bias::Neutral => f.write_str("NEUTRAL"),
        }
    }
}

/// The two most recent swing points on one side of the market.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwingLevel {
    pub current: Option<SwingPoint>,
    pub last: Option<SwingPoint>,
}

impl SwingLevel {
    /// Make `point` the current swing, keeping the previous current as `last`.
    ///
    /// Re-detecting the swing that is already current is a no-op, so running
    /// detection repeatedly over an overlapping window does not erase `last`.
    /// Returns whether the level changed.
    pub fn promote(&mut self, point: SwingPoint) -> bool {
        if let Some(current) = &self.current {
            if current.time == point.time && current.level == point.level {
                return false;
            }
        }
        self.last = self.current.replace(point);
        true
    }

    /// Price of the current swing, if one has been confirmed.
    pub fn level(&self) -> Option<f64> {
        self.current.as_ref().map(|p| p.level)
    }

    pub fn last_level(&self) -> Option<f64> {
        self.last.as_ref().map(|p| p.level)
    }
}
