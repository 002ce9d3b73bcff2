//! Brazilian-real amounts: cents conversion, display formatting, and parsing
//! of user input.
//!
//! Accounts carry balances in cents; transactions and summaries carry reais.

/// `30.50` -> `3050`. Halves round away from zero.
pub fn to_cents(value: f64) -> i64 {
    (value * 100.0).round() as i64
}

/// `3050` -> `30.5`.
pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

/// `1234.56` -> `"R$ 1.234,56"`; negatives render as `"-R$ 1.234,56"`.
pub fn format_brl(value: f64) -> String {
    let plain = format_plain(value.abs());
    if to_cents(value) < 0 {
        format!("-R$ {}", plain)
    } else {
        format!("R$ {}", plain)
    }
}

/// `1234.56` -> `"1.234,56"`: dot thousands separator, comma decimals.
pub fn format_plain(value: f64) -> String {
    let cents = to_cents(value);
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{}{},{:02}", sign, grouped, frac)
}

/// Parse a typed or formatted amount: `"R$ 30,50"` -> `30.5`,
/// `"1.234,56"` -> `1234.56`, `"12.5"` -> `12.5`. Anything unparseable is `0`.
///
/// When a comma is present it is the decimal separator and dots are
/// thousands separators.
pub fn parse_amount(input: &str) -> f64 {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replacen(',', ".", 1)
    } else {
        cleaned
    };
    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Reformat keystrokes as a cents-shifted amount: `"3050"` -> `"30,50"`.
/// Input without digits yields an empty string.
pub fn format_input(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return String::new();
    }
    // Very long inputs saturate rather than wrap.
    let cents = digits.parse::<i64>().unwrap_or(i64::MAX);
    format_plain(from_cents(cents))
}

/// Formatted amount -> cents for the backend.
pub fn value_for_backend(formatted: &str) -> i64 {
    to_cents(parse_amount(formatted))
}

/// Cents from the backend -> plain formatted amount for a form field.
pub fn value_for_form(cents: i64) -> String {
    format_plain(from_cents(cents))
}

