//! Reusable formatting utilities for CLI output
//!
//! Currency, timestamps and text clipping shared by the pretty and table
//! renderers.

use chrono::{DateTime, Local, Utc};

/// Format an amount as US dollars with thousands separators.
///
/// # Example output
/// - `$1,234.50`
/// - `$0.99`
/// - `-$5.00`
pub fn format_usd(amount: f64) -> String {
    if !amount.is_finite() {
        return "N/A".to_string();
    }

    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Format a UTC timestamp as local date/time.
///
/// # Example output
/// `01/15/2025 14:30 PST`
pub fn format_timestamp_local(timestamp: &DateTime<Utc>) -> String {
    let local = timestamp.with_timezone(&Local);
    format!(
        "{} {}",
        local.format("%m/%d/%Y %H:%M"),
        offset_to_tz_abbrev(local.offset().local_minus_utc())
    )
}

/// Convert a UTC offset (seconds) to a timezone abbreviation.
///
/// Falls back to `UTC+N` for offsets without a common abbreviation.
pub fn offset_to_tz_abbrev(offset_secs: i32) -> String {
    let offset_hours = offset_secs / 3600;
    let abbrev = match offset_hours {
        -10 => "HST",
        -9 => "AKST",
        -8 => "PST",
        -7 => "MST",
        -6 => "CST",
        -5 => "EST",
        0 => "UTC",
        1 => "CET",
        2 => "EET",
        9 => "JST",
        10 => "AEST",
        _ => return format!("UTC{:+}", offset_hours),
    };
    abbrev.to_string()
}

/// Clip `text` to `max` characters, ending with an ellipsis when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
