//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR here is the sum of the most recent `period` true ranges divided by
//! `period`, computed once per analysis from the full candle history.

use crate::domain::Candle;

/// Compute the True Range series from candles.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(candles: &[Candle]) -> Vec<f64> {
    let Some(first) = candles.first() else {
        return Vec::new();
    };

    let mut tr = Vec::with_capacity(candles.len());
    tr.push(first.high - first.low);

    for pair in candles.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let pc = prev.close;
        tr.push(
            (cur.high - cur.low)
                .max((cur.high - pc).abs())
                .max((cur.low - pc).abs()),
        );
    }

    tr
}

/// Average of the last `period` proper true ranges (those with a previous close).
///
/// The divisor is always `period`: a short history counts its missing ranges
/// as zero. Returns `None` for fewer than two candles or a zero period.
pub fn average_true_range(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < 2 {
        return None;
    }

    let tr = true_range(candles);
    let proper = &tr[1..];
    let window = &proper[proper.len().saturating_sub(period)..];
    Some(window.iter().sum::<f64>() / period as f64)
}
