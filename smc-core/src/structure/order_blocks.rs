//! Order blocks: the last opposing candle before a structural move.
//!
//! After a bullish break the order block is the most recent down-close candle
//! that was immediately followed by an up-close candle; after a bearish break
//! it is the most recent up-close candle followed by a down-close candle. Only
//! the four candles before the breaking candle are searched.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::Bias;
use crate::domain::Candle;

/// Maximum number of order blocks retained by a tracker.
pub const MAX_ORDER_BLOCKS: usize = 10;

/// Candles searched for an order block, excluding the latest.
pub const ORDER_BLOCK_SCAN: usize = 4;

/// A candidate institutional accumulation/distribution candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBlock {
    pub bar_high: f64,
    pub bar_low: f64,
    pub bar_time: NaiveDateTime,
    pub bias: Bias,
}

/// Search the candles before the latest for an order block matching `bias`.
///
/// Returns `None` for a neutral bias, too little history, or no matching
/// pattern.
pub fn find_order_block(candles: &[Candle], bias: Bias) -> Option<OrderBlock> {
    let n = candles.len();
    if n < 3 || !bias.is_directional() {
        return None;
    }
    let scan = &candles[(n - 1).saturating_sub(ORDER_BLOCK_SCAN)..n - 1];

    scan.windows(2)
        .rev()
        .find(|pair| {
            let (candidate, next) = (&pair[0], &pair[1]);
            match bias {
                Bias::Bullish => candidate.is_bearish() && next.is_bullish(),
                Bias::Bearish => candidate.is_bullish() && next.is_bearish(),
                Bias::Neutral => false,
            }
        })
        .map(|pair| OrderBlock {
            bar_high: pair[0].high,
            bar_low: pair[0].low,
            bar_time: pair[0].date,
            bias,
        })
}

/// Bounded list of order blocks, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBlockTracker {
    blocks: VecDeque<OrderBlock>,
    capacity: usize,
}

impl Default for OrderBlockTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBlockTracker {
    pub fn new() -> Self {
        Self::with_capacity(MAX_ORDER_BLOCKS)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity >= 1, "order block capacity must be >= 1");
        Self {
            blocks: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Insert at the front, evicting the oldest entry once over capacity.
    pub fn push(&mut self, block: OrderBlock) {
        self.blocks.push_front(block);
        if self.blocks.len() > self.capacity {
            self.blocks.pop_back();
        }
    }

    /// Look for an order block confirming `bias` and store it if found.
    pub fn record(&mut self, candles: &[Candle], bias: Bias) -> Option<&OrderBlock> {
        let block = find_order_block(candles, bias)?;
        self.push(block);
        self.blocks.front()
    }

    /// Most recent order block with the given bias.
    pub fn latest_for(&self, bias: Bias) -> Option<&OrderBlock> {
        self.blocks.iter().find(|b| b.bias == bias)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &OrderBlock> {
        self.blocks.iter()
    }
}
