//! Position sizing: how many standard lots a signal's stop distance allows.
//!
//! Classic fixed-fractional risk, expressed in forex lots:
//!
//! ```text
//! risk_amount = balance * risk_pct / 100
//! stop_pips   = |entry - stop| / pip_size
//! lots        = risk_amount / (stop_pips * pip_size) / 100_000
//! ```
//!
//! The pip is 0.01 for JPY-quoted pairs and 0.0001 for everything else. The
//! account is assumed to be denominated in the quote currency; no exchange
//! rate conversion is applied.
//!
//! # Example
//! - Balance: 10,000, risk 1% (100)
//! - EUR/USD entry 1.1000, stop 1.0950: 50 pips
//! - Lots: 100 / (50 * 0.0001) / 100,000 = 0.2

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::signal::Signal;

/// Units of the base currency in one standard lot.
pub const STANDARD_LOT: f64 = 100_000.0;

const JPY_PIP: f64 = 0.01;
const DEFAULT_PIP: f64 = 0.0001;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SizingError {
    #[error("account balance must be a positive number, got {0}")]
    InvalidBalance(f64),

    #[error("risk percentage must be in (0, 100], got {0}")]
    InvalidRiskPercent(f64),

    #[error("stop loss equals entry; a zero stop distance cannot be sized")]
    ZeroStopDistance,
}

/// Account balance and the share of it put at risk on one trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBudget {
    pub balance: f64,
    /// Percent, e.g. `1.0` for 1%.
    pub risk_pct: f64,
}

impl RiskBudget {
    pub fn new(balance: f64, risk_pct: f64) -> Result<Self, SizingError> {
        if !balance.is_finite() || balance <= 0.0 {
            return Err(SizingError::InvalidBalance(balance));
        }
        if !risk_pct.is_finite() || risk_pct <= 0.0 || risk_pct > 100.0 {
            return Err(SizingError::InvalidRiskPercent(risk_pct));
        }
        Ok(Self { balance, risk_pct })
    }

    pub fn risk_amount(&self) -> f64 {
        self.balance * self.risk_pct / 100.0
    }

    /// Size a trade whose stop sits `risk_distance` price units from entry.
    pub fn size(&self, risk_distance: f64, symbol: &str) -> Result<PositionSize, SizingError> {
        let risk_distance = risk_distance.abs();
        if risk_distance == 0.0 || !risk_distance.is_finite() {
            return Err(SizingError::ZeroStopDistance);
        }
        let pip = pip_size(symbol);
        let stop_pips = risk_distance / pip;
        let risk_amount = self.risk_amount();
        Ok(PositionSize {
            risk_amount,
            pip_size: pip,
            stop_pips,
            lots: risk_amount / (stop_pips * pip) / STANDARD_LOT,
        })
    }
}

/// Result of sizing one trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSize {
    pub risk_amount: f64,
    pub pip_size: f64,
    pub stop_pips: f64,
    pub lots: f64,
}

/// Price increment of one pip for `symbol`.
///
/// `USD/JPY`, `USDJPY` and `usdjpy` all quote in yen; any other symbol uses
/// the four-decimal pip.
pub fn pip_size(symbol: &str) -> f64 {
    let pair = symbol.replace('/', "").to_ascii_uppercase();
    if pair.len() == 6 && pair.ends_with("JPY") {
        JPY_PIP
    } else {
        DEFAULT_PIP
    }
}

/// Lots for a trade from `entry` to `stop` risking `risk_pct` percent of `balance`.
pub fn lot_size(
    balance: f64,
    risk_pct: f64,
    entry: f64,
    stop: f64,
    symbol: &str,
) -> Result<PositionSize, SizingError> {
    RiskBudget::new(balance, risk_pct)?.size(entry - stop, symbol)
}

/// Size `signal` from its entry-to-stop risk distance.
pub fn size_signal(signal: &Signal, budget: &RiskBudget) -> Result<PositionSize, SizingError> {
    budget.size(signal.risk_distance, &signal.symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;
    use crate::signal::tests::sample_signal;

    #[test]
    fn eurusd_fifty_pips_at_one_percent() {
        let size = lot_size(10_000.0, 1.0, 1.1000, 1.0950, "EUR/USD").unwrap();
        assert_eq!(size.pip_size, 0.0001);
        assert_approx(size.risk_amount, 100.0, 1e-9);
        assert_approx(size.stop_pips, 50.0, 1e-6);
        assert_approx(size.lots, 0.2, 1e-9);
    }

    #[test]
    fn jpy_quote_uses_two_decimal_pip() {
        let size = lot_size(10_000.0, 1.0, 150.00, 149.50, "USD/JPY").unwrap();
        assert_eq!(size.pip_size, 0.01);
        assert_approx(size.stop_pips, 50.0, 1e-6);
        assert_approx(size.lots, 0.002, 1e-12);
    }

    #[test]
    fn sell_side_stop_above_entry_sizes_the_same() {
        let buy = lot_size(5_000.0, 2.0, 1.2500, 1.2480, "GBPUSD").unwrap();
        let sell = lot_size(5_000.0, 2.0, 1.2480, 1.2500, "GBPUSD").unwrap();
        assert_approx(buy.lots, sell.lots, 1e-12);
        assert_approx(buy.stop_pips, 20.0, 1e-6);
    }

    #[test]
    fn pip_size_by_quote_currency() {
        assert_eq!(pip_size("USDJPY"), 0.01);
        assert_eq!(pip_size("eur/jpy"), 0.01);
        assert_eq!(pip_size("EURUSD"), 0.0001);
        assert_eq!(pip_size("JPYUSD"), 0.0001);
        assert_eq!(pip_size("SPY"), 0.0001);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        assert_eq!(
            lot_size(0.0, 1.0, 1.1, 1.0, "EURUSD").unwrap_err(),
            SizingError::InvalidBalance(0.0)
        );
        assert_eq!(
            lot_size(1_000.0, 0.0, 1.1, 1.0, "EURUSD").unwrap_err(),
            SizingError::InvalidRiskPercent(0.0)
        );
        assert_eq!(
            lot_size(1_000.0, 150.0, 1.1, 1.0, "EURUSD").unwrap_err(),
            SizingError::InvalidRiskPercent(150.0)
        );
        assert_eq!(
            lot_size(1_000.0, 1.0, 1.1, 1.1, "EURUSD").unwrap_err(),
            SizingError::ZeroStopDistance
        );
    }

    #[test]
    fn signal_is_sized_from_its_risk_distance() {
        // EURUSD, risk distance 0.0050
        let signal = sample_signal();
        let budget = RiskBudget::new(20_000.0, 0.5).unwrap();
        let size = size_signal(&signal, &budget).unwrap();
        assert_approx(size.risk_amount, 100.0, 1e-9);
        assert_approx(size.lots, 0.2, 1e-9);
    }
}
