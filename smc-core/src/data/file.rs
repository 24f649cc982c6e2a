//! File-tree candle provider.
//!
//! Layout: `{root}/{SYMBOL}_{timeframe}.json`, falling back to `.csv`.
//! The symbol is upper-cased with `/` removed, so `EUR/USD` on the hourly
//! timeframe reads `EURUSD_1h.json`.

use std::path::{Path, PathBuf};

use super::csv_import::load_csv_file;
use super::json_import::load_json_file;
use super::provider::{CandleProvider, DataError, DataSource, FetchResult};
use crate::domain::{CandleOrder, Timeframe};

#[derive(Debug, Clone)]
pub struct FileProvider {
    root: PathBuf,
}

impl FileProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File stem for a symbol/timeframe pair: `EURUSD_1h`.
    pub fn file_stem(symbol: &str, timeframe: Timeframe) -> String {
        let symbol: String = symbol
            .trim()
            .chars()
            .filter(|c| *c != '/')
            .collect::<String>()
            .to_ascii_uppercase();
        format!("{symbol}_{timeframe}")
    }

    fn candidate(&self, symbol: &str, timeframe: Timeframe, ext: &str) -> PathBuf {
        self.root
            .join(format!("{}.{ext}", Self::file_stem(symbol, timeframe)))
    }
}

impl CandleProvider for FileProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&self, symbol: &str, timeframe: Timeframe) -> Result<FetchResult, DataError> {
        let json = self.candidate(symbol, timeframe, "json");
        let csv = self.candidate(symbol, timeframe, "csv");

        let (candles, source) = if json.is_file() {
            (load_json_file(&json)?, DataSource::JsonImport)
        } else if csv.is_file() {
            (load_csv_file(&csv)?, DataSource::CsvImport)
        } else {
            tracing::warn!(
                root = %self.root.display(),
                symbol,
                %timeframe,
                "no candle file found"
            );
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
                timeframe,
            });
        };

        Ok(FetchResult {
            symbol: symbol.to_string(),
            timeframe,
            candles,
            order: CandleOrder::Unordered,
            source,
        })
    }
}
