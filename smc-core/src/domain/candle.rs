//! Candle: the fundamental market data unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OHLC candle for a single symbol on a single interval.
///
/// Volume is optional: forex feeds from the data connector carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

/// Why a candle was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CandleError {
    #[error("{field} is not a finite number")]
    NonFinite { field: &'static str },

    #[error("high {high} is below the candle body top {body_top}")]
    HighBelowBody { high: f64, body_top: f64 },

    #[error("low {low} is above the candle body bottom {body_bottom}")]
    LowAboveBody { low: f64, body_bottom: f64 },
}

impl Candle {
    pub fn new(date: NaiveDateTime, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Up-close candle.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Down-close candle.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    pub fn body_top(&self) -> f64 {
        self.open.max(self.close)
    }

    pub fn body_bottom(&self) -> f64 {
        self.open.min(self.close)
    }

    /// Check the OHLC invariants: all prices finite, the wicks enclose the body.
    pub fn validate(&self) -> Result<(), CandleError> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() {
                return Err(CandleError::NonFinite { field });
            }
        }
        if let Some(volume) = self.volume {
            if !volume.is_finite() {
                return Err(CandleError::NonFinite { field: "volume" });
            }
        }

        let body_top = self.body_top();
        if self.high < body_top {
            return Err(CandleError::HighBelowBody {
                high: self.high,
                body_top,
            });
        }
        let body_bottom = self.body_bottom();
        if self.low > body_bottom {
            return Err(CandleError::LowAboveBody {
                low: self.low,
                body_bottom,
            });
        }
        Ok(())
    }
}
