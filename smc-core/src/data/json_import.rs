//! JSON import for the data connector's candle format.
//!
//! The connector answers with either an array of candle records or a single
//! `{"error": "..."}` object.

use std::path::Path;

use serde::Deserialize;

use super::provider::DataError;
use super::records::{records_to_candles, CandleRecord};
use crate::domain::Candle;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConnectorResponse {
    Candles(Vec<CandleRecord>),
    Failure { error: String },
}

/// Parse a connector response body into candles.
pub fn parse_json_candles(body: &str) -> Result<Vec<Candle>, DataError> {
    let response: ConnectorResponse = serde_json::from_str(body).map_err(|e| {
        if e.is_data() {
            DataError::ResponseFormatChanged(e.to_string())
        } else {
            DataError::Json(e)
        }
    })?;

    match response {
        ConnectorResponse::Candles(records) => records_to_candles(records),
        ConnectorResponse::Failure { error } => Err(DataError::Provider(error)),
    }
}

/// Read and parse a JSON candle file.
pub fn load_json_file(path: &Path) -> Result<Vec<Candle>, DataError> {
    let body = std::fs::read_to_string(path)?;
    let candles = parse_json_candles(&body)?;
    tracing::debug!(path = %path.display(), candles = candles.len(), "loaded json candles");
    Ok(candles)
}
