//! Price formatting for rationale text and CLI output.

/// Two decimals for prices above 10, five otherwise (forex quotes).
pub fn format_price(price: f64) -> String {
    if price > 10.0 {
        format!("{price:.2}")
    } else {
        format!("{price:.5}")
    }
}
