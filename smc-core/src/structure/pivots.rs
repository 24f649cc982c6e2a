//! Pivot detection: swing highs and lows confirmed by a symmetric window.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::Candle;

/// A confirmed local extremum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub level: f64,
    pub time: NaiveDateTime,
    pub index: usize,
}

/// All pivots found in one detection pass, in index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pivots {
    pub highs: Vec<SwingPoint>,
    pub lows: Vec<SwingPoint>,
}

impl Pivots {
    pub fn latest_high(&self) -> Option<&SwingPoint> {
        self.highs.last()
    }

    pub fn latest_low(&self) -> Option<&SwingPoint> {
        self.lows.last()
    }

    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }
}

/// Find swing highs and lows with a lookback radius of `lookback` candles.
///
/// Candle `i` is a swing high when its high equals the highest high of
/// `candles[i - lookback..=i + lookback]` (swing lows symmetric). Only indices
/// with a full window on both sides are examined, so fewer than
/// `2 * lookback + 1` candles yields no pivots. Flat tops record every tied
/// index.
pub fn find_pivots(candles: &[Candle], lookback: usize) -> Pivots {
    assert!(lookback >= 1, "pivot lookback must be >= 1");

    let mut pivots = Pivots::default();
    let n = candles.len();
    if n < 2 * lookback + 1 {
        return pivots;
    }

    for i in lookback..n - lookback {
        let window = &candles[i - lookback..=i + lookback];
        let max = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let min = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

        let candle = &candles[i];
        if candle.high == max {
            pivots.highs.push(SwingPoint {
                level: candle.high,
                time: candle.date,
                index: i,
            });
        }
        if candle.low == min {
            pivots.lows.push(SwingPoint {
                level: candle.low,
                time: candle.date,
                index: i,
            });
        }
    }

    pivots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_candles, make_ohlc_candles};

    #[test]
    fn finds_single_peak_and_trough() {
        // Peak at index 3, trough at index 7
        let highs = [101.0, 102.0, 103.0, 107.0, 104.0, 103.0, 102.0, 100.0, 101.0, 101.0, 102.0];
        let lows = [99.0, 100.0, 101.0, 103.0, 101.0, 100.0, 98.0, 94.0, 97.0, 98.0, 99.0];
        let data: Vec<(f64, f64, f64, f64)> = highs
            .iter()
            .zip(lows.iter())
            .map(|(&h, &l)| (l + 0.5, h, l, h - 0.5))
            .collect();
        let candles = make_ohlc_candles(&data);
        let pivots = find_pivots(&candles, 2);

        let high_idx: Vec<usize> = pivots.highs.iter().map(|p| p.index).collect();
        let low_idx: Vec<usize> = pivots.lows.iter().map(|p| p.index).collect();
        assert_eq!(high_idx, vec![3]);
        assert_eq!(low_idx, vec![7]);
        assert_eq!(pivots.latest_low().unwrap().level, 94.0);
        assert_eq!(pivots.latest_high().unwrap().level, 107.0);
    }

    #[test]
    fn too_short_for_window_yields_nothing() {
        let candles = make_candles(&[100.0, 105.0, 100.0, 95.0]);
        let pivots = find_pivots(&candles, 2); // needs 5 candles
        assert!(pivots.is_empty());
        assert!(pivots.latest_high().is_none());
    }

    #[test]
    fn edges_are_never_pivots() {
        // Highest high at the very last candle cannot be confirmed.
        let candles = make_candles(&[100.0, 101.0, 102.0, 103.0, 104.0, 110.0]);
        let pivots = find_pivots(&candles, 2);
        assert!(pivots.highs.iter().all(|p| p.index >= 2 && p.index < 4));
        assert!(pivots.highs.iter().all(|p| p.index != 5));
    }

    #[test]
    fn plateau_records_every_tied_index() {
        let flat = (100.0, 101.0, 99.0, 100.0);
        let candles = make_ohlc_candles(&[flat; 7]);
        let pivots = find_pivots(&candles, 2);
        let idx: Vec<usize> = pivots.highs.iter().map(|p| p.index).collect();
        assert_eq!(idx, vec![2, 3, 4]);
        assert_eq!(pivots.lows.len(), 3);
    }

    #[test]
    fn pivot_carries_time_and_level() {
        let closes = [100.0, 101.0, 106.0, 101.0, 100.0];
        let candles = make_candles(&closes);
        let pivots = find_pivots(&candles, 2);
        let high = pivots.latest_high().unwrap();
        assert_eq!(high.index, 2);
        assert_eq!(high.level, candles[2].high);
        assert_eq!(high.time, candles[2].date);
    }

    #[test]
    #[should_panic(expected = "pivot lookback must be >= 1")]
    fn rejects_zero_lookback() {
        find_pivots(&[], 0);
    }
}
