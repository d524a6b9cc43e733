//! Price formatting in the `es-AR` convention: currency symbol, a space,
//! dot-grouped thousands and no decimals.

use crate::data::property::Currency;

pub fn currency_symbol(currency: Currency) -> &'static str {
    match currency {
        Currency::Usd => "US$",
        Currency::Ars => "$",
    }
}

/// Groups the digits of a whole number with `.` every three places
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    grouped
}

pub fn format_price(price: f64, currency: Currency) -> String {
    let rounded = price.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let whole = if rounded.is_finite() { rounded.abs() as u64 } else { 0 };
    format!("{}{} {}", sign, currency_symbol(currency), group_thousands(whole))
}
