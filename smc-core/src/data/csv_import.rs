//! CSV import with headers `date,open,high,low,close[,volume]`.

use std::io::Read;
use std::path::Path;

use super::provider::DataError;
use super::records::CandleRecord;
use crate::domain::Candle;

/// Parse CSV candles from any reader. Empty cells count as missing.
pub fn read_csv_candles<R: Read>(reader: R) -> Result<Vec<Candle>, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut candles = Vec::new();
    for (index, row) in rdr.deserialize::<CandleRecord>().enumerate() {
        candles.push(row?.into_candle(index)?);
    }
    Ok(candles)
}

/// Read a CSV candle file.
pub fn load_csv_file(path: &Path) -> Result<Vec<Candle>, DataError> {
    let file = std::fs::File::open(path)?;
    let candles = read_csv_candles(file)?;
    tracing::debug!(path = %path.display(), candles = candles.len(), "loaded csv candles");
    Ok(candles)
}
