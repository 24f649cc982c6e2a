//! Candle data loading: provider trait, file imports and ticker mapping.

pub mod csv_import;
pub mod file;
pub mod json_import;
pub mod provider;
pub mod records;
pub mod ticker;

pub use csv_import::{load_csv_file, read_csv_candles};
pub use file::FileProvider;
pub use json_import::{load_json_file, parse_json_candles};
pub use provider::{CandleProvider, DataError, DataSource, FetchResult, InMemoryProvider};
pub use records::{parse_timestamp, records_to_candles, CandleRecord};
pub use ticker::provider_ticker;

use std::path::Path;

use crate::domain::Candle;

/// Load candles from a `.json` or `.csv` file, chosen by extension.
///
/// Anything that is not `.csv` is read as connector JSON.
pub fn load_candles(path: &Path) -> Result<Vec<Candle>, DataError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_csv_file(path)
    } else {
        load_json_file(path)
    }
}
