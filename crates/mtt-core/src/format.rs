//! Duration and timestamp rendering.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;

/// How durations are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationFormat {
    /// Fractional minutes with two decimals, e.g. `12.50m`.
    #[default]
    Minutes,
    /// Non-zero units followed by seconds, e.g. `1h 2m 5s`.
    Units,
}

/// Time zone used when rendering timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampZone {
    #[default]
    Local,
    Utc,
}

/// Read-only display settings for the formatter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub duration_format: DurationFormat,
    /// With [`DurationFormat::Units`], split hours into years, months, and days.
    pub fine_grained_durations: bool,
    /// Moment-style pattern such as `YYYY-MM-DD HH:mm:ss`.
    pub timestamp_format: String,
    pub timestamp_zone: TimestampZone,
    pub csv_delimiter: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            duration_format: DurationFormat::Minutes,
            fine_grained_durations: true,
            timestamp_format: "YY-MM-DD hh:mm:ss".to_string(),
            timestamp_zone: TimestampZone::Local,
            csv_delimiter: ",".to_string(),
        }
    }
}

// ========== Durations ==========

const SECS_PER_HOUR: u64 = 3_600;

/// Formats a duration in seconds according to `settings`.
///
/// Negative durations keep their sign; they only arise from manual total
/// adjustments.
#[expect(
    clippy::cast_precision_loss,
    reason = "display-only conversion of second counts"
)]
pub fn format_duration(seconds: i64, settings: &ReportSettings) -> String {
    match settings.duration_format {
        DurationFormat::Minutes => format!("{:.2}m", seconds as f64 / 60.0),
        DurationFormat::Units => {
            let body = format_units(seconds.unsigned_abs(), settings.fine_grained_durations);
            if seconds < 0 {
                format!("-{body}")
            } else {
                body
            }
        }
    }
}

fn format_units(total: u64, fine_grained: bool) -> String {
    let seconds = total % 60;
    let minutes = total / 60 % 60;
    let mut hours = total / SECS_PER_HOUR;
    let mut ret = String::new();

    if fine_grained {
        let (years, months, days) = split_days(hours / 24);
        hours %= 24;
        for (value, unit) in [(years, "y"), (months, "M"), (days, "d")] {
            if value > 0 {
                ret.push_str(&format!("{value}{unit} "));
            }
        }
    }
    if hours > 0 {
        ret.push_str(&format!("{hours}h "));
    }
    if minutes > 0 {
        ret.push_str(&format!("{minutes}m "));
    }
    ret.push_str(&format!("{seconds}s"));
    ret
}

/// Splits a day count into years, months, and remaining days using the
/// average month length of the 400-year Gregorian cycle.
const fn split_days(days: u64) -> (u64, u64, u64) {
    let months = days * 4_800 / 146_097;
    let days = days - (months * 146_097).div_ceil(4_800);
    (months / 12, months % 12, days)
}

// ========== Timestamps ==========

/// Moment-style tokens and their `chrono` equivalents, longest first.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
    ("ZZ", "%z"),
    ("Z", "%:z"),
    ("X", "%s"),
];

/// Translates a moment-style pattern into a `chrono` format string.
///
/// Text in `[brackets]` is copied literally; unknown characters pass through.
pub fn to_strftime(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;
    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                push_literal(&mut out, &rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }
        if let Some((token, spec)) = TOKENS.iter().find(|(t, _)| rest.starts_with(*t)) {
            out.push_str(spec);
            rest = &rest[token.len()..];
            continue;
        }
        push_literal(&mut out, &rest[..c.len_utf8()]);
        rest = &rest[c.len_utf8()..];
    }
    out
}

fn push_literal(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == '%' {
            out.push_str("%%");
        } else {
            out.push(c);
        }
    }
}

/// Formats a Unix timestamp with `settings.timestamp_format`.
///
/// Timestamps outside chrono's range render as the raw number.
pub fn format_timestamp(timestamp: Timestamp, settings: &ReportSettings) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp(timestamp, 0) else {
        return timestamp.to_string();
    };
    let spec = to_strftime(&settings.timestamp_format);
    match settings.timestamp_zone {
        TimestampZone::Utc => utc.format(&spec).to_string(),
        TimestampZone::Local => utc.with_timezone(&Local).format(&spec).to_string(),
    }
}
