//! Utility functions for formatting and dates
//!
//! Currency formatting is centralized here so the alert email and the
//! terminal summary display prices the same way.

pub mod dates;

use rust_decimal::Decimal;

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// "US$ " prefix
    Usd,
    /// "CN¥ " prefix
    Cny,
    /// "A$ " prefix
    Aud,
}

impl CurrencySymbol {
    fn prefix(self) -> &'static str {
        match self {
            CurrencySymbol::Usd => "US$ ",
            CurrencySymbol::Cny => "CN¥ ",
            CurrencySymbol::Aud => "A$ ",
        }
    }
}

/// Format a Decimal with two decimals and `,` thousands separators.
///
/// # Examples
/// ```
/// use ticketwatch::utils::{format_currency, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.5), CurrencySymbol::Usd), "US$ 1,234.50");
/// assert_eq!(format_currency(dec!(61.6), CurrencySymbol::Aud), "A$ 61.60");
/// ```
pub fn format_currency(value: Decimal, symbol: CurrencySymbol) -> String {
    let is_negative = value < Decimal::ZERO;
    let formatted = format!("{:.2}", value.abs());
    let (integer_part, decimal_part) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    format!(
        "{}{}{}.{}",
        symbol.prefix(),
        sign,
        with_separators,
        decimal_part
    )
}

/// Format an optional price, `-` when absent.
pub fn format_optional(value: Option<Decimal>, symbol: CurrencySymbol) -> String {
    value
        .map(|v| format_currency(v, symbol))
        .unwrap_or_else(|| "-".to_string())
}
