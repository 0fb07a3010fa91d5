//! Maps raw x-axis cells to chartable coordinates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{Scalar, XValue};
use crate::numeric::parse_number;

static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})(?:-(\d{2}))?").expect("date prefix pattern is valid")
});

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Resolve a cell to an x coordinate.
///
/// Priority: native number, date-like string, numeric string, then the 1-based
/// row position so categorical values keep result order and never share an x.
pub fn resolve_x(value: &Scalar, row_index: usize) -> XValue {
    match value {
        Scalar::Number(n) if n.is_finite() => XValue::Numeric(*n),
        Scalar::Text(s) => {
            if let Some(dt) = parse_date_like(s) {
                XValue::Temporal(dt)
            } else if let Some(n) = parse_number(s) {
                XValue::Numeric(n)
            } else {
                XValue::Ordinal(row_index + 1)
            }
        }
        _ => XValue::Ordinal(row_index + 1),
    }
}

/// Parse strings starting with `YYYY-MM` (optionally `-DD`) as UTC instants.
/// Returns `None` when the prefix is absent or names an impossible date.
pub fn parse_date_like(text: &str) -> Option<DateTime<Utc>> {
    let caps = DATE_PREFIX.captures(text)?;

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = match caps.get(3) {
        Some(d) => d.as_str().parse().ok()?,
        None => 1,
    };
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}
