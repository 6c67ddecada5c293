//! # Display Formatting
//!
//! Money and percentage formatting for the terminal tables.
//!
//! Amounts render with grouped thousands and no decimals, the way the
//! store's register slips show them (`$ 1.234.567`).

/// Formats an amount with the currency symbol: `$ 12.500`.
///
/// Non-finite amounts render as `-`, matching how the reporting screens
/// show missing values.
pub fn money(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return "-".to_string();
    }
    format!("{} {}", symbol, grouped(amount))
}

/// Formats an amount without a symbol: `12.500`.
pub fn grouped(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let negative = rounded < 0;
    let digits = rounded.abs().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }

    if negative {
        format!("-{out}")
    } else {
        out
    }
}

/// Formats a percentage with one decimal: `42.5%`.
pub fn pct(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    format!("{value:.1}%")
}

/// Formats an optional ratio with two decimals; `None` renders as `N/A`.
pub fn ratio(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "N/A".to_string(),
    }
}

/// Formats days of coverage; unbounded coverage renders as `∞`.
pub fn days(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.1} days"),
        _ => "∞".to_string(),
    }
}
