//! Raw candle records as emitted by the data connector.
//!
//! Every field is optional so that a record with a missing price is reported
//! by name instead of failing deep inside serde or turning into NaN.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::provider::DataError;
use crate::domain::Candle;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandleRecord {
    pub date: Option<String>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl CandleRecord {
    /// Convert to a candle; `index` is used for error reporting only.
    ///
    /// OHLC invariants are checked later by `CandleSeries`.
    pub fn into_candle(self, index: usize) -> Result<Candle, DataError> {
        let raw_date = self
            .date
            .ok_or(DataError::MissingField { index, field: "date" })?;
        let date = parse_timestamp(&raw_date).ok_or_else(|| DataError::BadTimestamp {
            index,
            value: raw_date.clone(),
        })?;

        let field = |value: Option<f64>, name: &'static str| {
            value.ok_or(DataError::MissingField { index, field: name })
        };

        Ok(Candle {
            date,
            open: field(self.open, "open")?,
            high: field(self.high, "high")?,
            low: field(self.low, "low")?,
            close: field(self.close, "close")?,
            volume: self.volume,
        })
    }
}

/// Convert a batch of records, failing on the first bad one.
pub fn records_to_candles(records: Vec<CandleRecord>) -> Result<Vec<Candle>, DataError> {
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.into_candle(i))
        .collect()
}

/// Parse the timestamp formats seen from providers.
///
/// RFC 3339 values are converted to UTC and the offset dropped; date-only
/// values map to midnight.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
