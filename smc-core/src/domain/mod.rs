//! Domain types

pub mod candle;
pub mod series;
pub mod timeframe;

pub use candle::{Candle, CandleError};
pub use series::{CandleOrder, CandleSeries};
pub use timeframe::{Timeframe, UnsupportedTimeframe};

/// Symbol type alias
pub type Symbol = String;
