//! Utility functions for the gateway

use num_format::{Locale, ToFormattedString};

/// Truncate toward zero, saturating at the `i64` bounds
///
/// Model outputs are reported as whole quintals and rupees.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn truncate(value: f64) -> i64 {
    // `as` saturates and maps NaN to zero
    value.trunc() as i64
}

/// Format with thousands separators: `1234567` -> `1,234,567`
#[must_use]
pub fn thousands(value: i64) -> String {
    value.to_formatted_string(&Locale::en)
}

/// Escape text for inclusion in HTML element content or attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
