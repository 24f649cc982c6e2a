//! Mapping from trading symbols to the data provider's ticker format.

const ALIASES: &[(&str, &str)] = &[
    ("US30", "^DJI"),
    ("SPX500", "^GSPC"),
    ("NAS100", "^IXIC"),
    ("XAU/USD", "GC=F"),
    ("XAUUSD", "GC=F"),
    ("XAG/USD", "SI=F"),
    ("XAGUSD", "SI=F"),
    ("USOIL", "CL=F"),
];

/// Provider ticker for a trading symbol.
///
/// Index and commodity aliases win over the forex rule, so `XAU/USD` maps to
/// gold futures rather than `XAUUSD=X`.
pub fn provider_ticker(symbol: &str) -> String {
    let symbol = symbol.trim().to_ascii_uppercase();

    if let Some((_, ticker)) = ALIASES.iter().find(|(alias, _)| *alias == symbol) {
        return (*ticker).to_string();
    }
    if symbol.contains('/') {
        return format!("{}=X", symbol.replace('/', ""));
    }
    if let Some(base) = symbol.strip_suffix("USDT") {
        return format!("{base}-USD");
    }
    symbol
}
