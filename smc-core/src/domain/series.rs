//! Candle store: a validated, oldest-first candle sequence.
//!
//! Providers disagree on ordering: the data connector returns newest-first,
//! file imports are usually oldest-first, and hand-assembled data may be in
//! any order. Everything is normalized here so that analysis code can rely on
//! `candles[n - 1]` being the latest candle.

use serde::{Deserialize, Serialize};

use super::candle::Candle;
use crate::error::AnalysisError;

/// Ordering of a caller-supplied candle sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandleOrder {
    /// Index 0 is the oldest candle. Dates must be non-decreasing.
    #[default]
    OldestFirst,
    /// Index 0 is the latest candle. Dates must be non-increasing.
    NewestFirst,
    /// Any order; sorted by date (stable, so equal dates keep input order).
    Unordered,
}

/// Validated candles, oldest-first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Validate and normalize `candles` declared to be in `order`.
    ///
    /// Error indices refer to positions in the caller's sequence.
    pub fn new(mut candles: Vec<Candle>, order: CandleOrder) -> Result<Self, AnalysisError> {
        for (index, candle) in candles.iter().enumerate() {
            candle
                .validate()
                .map_err(|source| AnalysisError::DataShape { index, source })?;
        }

        match order {
            CandleOrder::OldestFirst => {
                if let Some(index) = first_break(&candles, |prev, next| prev.date <= next.date) {
                    return Err(AnalysisError::OutOfOrder { index });
                }
            }
            CandleOrder::NewestFirst => {
                if let Some(index) = first_break(&candles, |prev, next| prev.date >= next.date) {
                    return Err(AnalysisError::OutOfOrder { index });
                }
                candles.reverse();
            }
            CandleOrder::Unordered => candles.sort_by_key(|c| c.date),
        }

        Ok(Self { candles })
    }

    pub fn oldest_first(candles: Vec<Candle>) -> Result<Self, AnalysisError> {
        Self::new(candles, CandleOrder::OldestFirst)
    }

    pub fn newest_first(candles: Vec<Candle>) -> Result<Self, AnalysisError> {
        Self::new(candles, CandleOrder::NewestFirst)
    }

    pub fn unordered(candles: Vec<Candle>) -> Result<Self, AnalysisError> {
        Self::new(candles, CandleOrder::Unordered)
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// The most recent candle.
    pub fn latest(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn into_inner(self) -> Vec<Candle> {
        self.candles
    }
}

/// Index of the first candle that does not satisfy `ok(prev, candle)`.
fn first_break(candles: &[Candle], ok: impl Fn(&Candle, &Candle) -> bool) -> Option<usize> {
    candles
        .windows(2)
        .position(|pair| !ok(&pair[0], &pair[1]))
        .map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CandleError;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(day: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::days(day)
    }

    fn candle(day: i64, close: f64) -> Candle {
        Candle::new(at(day), close, close + 1.0, close - 1.0, close)
    }

    #[test]
    fn newest_first_is_reversed() {
        let input = vec![candle(2, 102.0), candle(1, 101.0), candle(0, 100.0)];
        let series = CandleSeries::newest_first(input).unwrap();
        let closes: Vec<f64> = series.iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![100.0, 101.0, 102.0]);
        assert_eq!(series.latest().unwrap().close, 102.0);
    }

    #[test]
    fn unordered_is_sorted_by_date() {
        let input = vec![candle(1, 101.0), candle(2, 102.0), candle(0, 100.0)];
        let series = CandleSeries::unordered(input).unwrap();
        let days: Vec<NaiveDateTime> = series.iter().map(|c| c.date).collect();
        assert_eq!(days, vec![at(0), at(1), at(2)]);
    }

    #[test]
    fn all_orderings_normalize_to_the_same_series() {
        let oldest = vec![candle(0, 100.0), candle(1, 101.0), candle(2, 102.0)];
        let mut newest = oldest.clone();
        newest.reverse();
        let shuffled = vec![oldest[2].clone(), oldest[0].clone(), oldest[1].clone()];

        let a = CandleSeries::oldest_first(oldest).unwrap();
        let b = CandleSeries::newest_first(newest).unwrap();
        let c = CandleSeries::unordered(shuffled).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn declared_order_is_checked() {
        let input = vec![candle(0, 100.0), candle(2, 102.0), candle(1, 101.0)];
        assert_eq!(
            CandleSeries::oldest_first(input.clone()),
            Err(AnalysisError::OutOfOrder { index: 2 })
        );
        assert_eq!(
            CandleSeries::newest_first(input),
            Err(AnalysisError::OutOfOrder { index: 1 })
        );
    }

    #[test]
    fn malformed_candle_is_rejected_with_its_index() {
        let mut bad = candle(1, 101.0);
        bad.high = f64::NAN;
        let input = vec![candle(0, 100.0), bad];
        assert_eq!(
            CandleSeries::oldest_first(input),
            Err(AnalysisError::DataShape {
                index: 1,
                source: CandleError::NonFinite { field: "high" },
            })
        );
    }

    #[test]
    fn empty_series() {
        let series = CandleSeries::oldest_first(Vec::new()).unwrap();
        assert!(series.is_empty());
        assert!(series.latest().is_none());
    }
}
