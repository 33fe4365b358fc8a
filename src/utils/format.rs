// Display formatting shared by the TUI and the CLI

use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use unicode_width::UnicodeWidthStr;

/// Group digits in thousands: `1234567` -> `1,234,567`
pub fn format_number(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Long form date used for "time joined", e.g. `14 Nov 2023, 22:13`
pub fn format_long_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.format("%-d %b %Y, %H:%M").to_string()
}

/// Pad or truncate `text` to exactly `width` terminal columns
pub fn fit_width(text: &str, width: usize) -> String {
    let current = UnicodeWidthStr::width(text);
    if current <= width {
        return format!("{}{}", text, " ".repeat(width - current));
    }

    let mut fitted = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        fitted.push(ch);
        used += ch_width;
    }
    if width > 0 {
        fitted.push('…');
        used += 1;
    }
    fitted.push_str(&" ".repeat(width.saturating_sub(used)));
    fitted
}
