//! Date parsing and period keys.
//!
//! Week numbers follow the journal's own scheme, not ISO-8601:
//! `week = (day_of_year0 + jan1_weekday_from_sunday) / 7 + 1`. Week 1 is the
//! (Sunday-started) week containing January 1st, so a year can have a week 54
//! and the first days of January never belong to the previous year. Existing
//! bucket labels depend on this numbering.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};

use crate::models::period::{PeriodKeys, Timeframe};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 5] = ["%m/%d/%Y", "%B %d %Y", "%B %d, %Y", "%b %d %Y", "%b %d, %Y"];

/// Parse whatever the backend stored as a trade date.
///
/// Plain dates are taken as calendar dates (no time-zone shift). Timestamps
/// with an offset are converted to the local calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Journal week number of a date (1-based).
pub fn week_number(date: NaiveDate) -> u32 {
    let jan1_offset = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .map(|jan1| jan1.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (date.ordinal0() + jan1_offset) / 7 + 1
}

/// All four keys for a parsed date.
pub fn keys_for(date: NaiveDate) -> PeriodKeys {
    PeriodKeys {
        date,
        day: date.format("%Y-%m-%d").to_string(),
        week: format!("{}-W{}", date.year(), week_number(date)),
        month: date.format("%Y-%m").to_string(),
        year: date.year().to_string(),
    }
}

/// Keys for a raw date string; `None` when the date does not parse.
pub fn period_keys(raw: &str) -> Option<PeriodKeys> {
    parse_date(raw).map(keys_for)
}

/// Display label for a bucket key.
///
/// Daily `2024-01-05` → `01/05/2024`, monthly `2024-01` → `01/2024`;
/// weekly and yearly keys are shown as-is.
pub fn label(timeframe: Timeframe, key: &str) -> String {
    match timeframe {
        Timeframe::Daily => day_label(key),
        Timeframe::Monthly => match key.split_once('-') {
            Some((y, m)) => format!("{m}/{y}"),
            None => key.to_string(),
        },
        Timeframe::Weekly | Timeframe::Yearly => key.to_string(),
    }
}

/// `YYYY-MM-DD` → `MM/DD/YYYY`. Anything else is returned unchanged.
pub fn day_label(key: &str) -> String {
    let parts: Vec<&str> = key.split('-').collect();
    match parts.as_slice() {
        [y, m, d] => format!("{m}/{d}/{y}"),
        _ => key.to_string(),
    }
}

/// Short weekday name (`Mon`) for a day key; empty if it does not parse.
pub fn weekday_name(day_key: &str) -> String {
    parse_date(day_key)
        .map(|d| d.format("%a").to_string())
        .unwrap_or_default()
}

/// Chronological order for bucket keys.
///
/// Digit runs compare numerically, everything else lexically. For the
/// zero-padded day/month/year keys this is plain string order; it also puts
/// `2024-W9` before `2024-W10`.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.is_empty(), b.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        let (seg_a, rest_a) = split_segment(a);
        let (seg_b, rest_b) = split_segment(b);
        let ord = match (seg_a.parse::<u64>(), seg_b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| seg_a.len().cmp(&seg_b.len())),
            _ => seg_a.cmp(seg_b),
        };
        if ord != Ordering::Equal {
            return ord;
        }
        a = rest_a;
        b = rest_b;
    }
}

/// Split off the leading run of ASCII digits or non-digits.
fn split_segment(s: &str) -> (&str, &str) {
    let digits = s.as_bytes()[0].is_ascii_digit();
    let end = s
        .bytes()
        .position(|c| c.is_ascii_digit() != digits)
        .unwrap_or(s.len());
    s.split_at(end)
}
