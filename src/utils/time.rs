//! Time expression parsing: absolute times, relative deltas and "junction" ranges.
//!
//! Accepted inputs:
//! - `_30m`, `+1h`: minutes / hours before (`_`) or after (`+`) now
//! - `17:45`, `1:00PM`, `01:00:00am`: a time of day on the reference date
//! - `2020-09-01 13:00:00`: a full date and time
//! - `2020-09-01 01:00-02:00`: a junction, one date with a start and an end time

use crate::errors::{AppError, AppResult};
use crate::utils::date::{DATE_FORMAT, parse_date};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;

/// Canonical format used for storage and display.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Tried in order; the first format that parses wins.
pub const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %I:%M:%S%p",
    "%Y-%m-%d %-I:%M:%S%p",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %-H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %-H:%M",
    "%Y-%m-%d %I:%M%p",
    "%Y-%m-%d %-I:%M%p",
];

/// Inputs up to this length are a bare time of day.
const BARE_TIME_MAX_LEN: usize = 11;

static DELTA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([_+])(\d+)([A-Za-z])$").expect("delta regex is valid")
});

/// Parse any single time expression: a delta when it starts with `_` or `+`,
/// otherwise an absolute time (bare times land on `reference`, or on `now`'s date).
pub fn parse_expression(
    input: &str,
    reference: Option<NaiveDate>,
    now: NaiveDateTime,
) -> AppResult<NaiveDateTime> {
    let input = input.trim();
    if input.starts_with('_') || input.starts_with('+') {
        return parse_delta(input, now);
    }
    parse_date_and_time(input, reference.unwrap_or_else(|| now.date()))
}

/// `_30m` → now - 30 minutes, `+1h` → now + 1 hour.
pub fn parse_delta(expr: &str, now: NaiveDateTime) -> AppResult<NaiveDateTime> {
    let caps = DELTA_RE
        .captures(expr.trim())
        .ok_or_else(|| AppError::Parse(format!("invalid time delta '{}'", expr)))?;

    let amount: i64 = caps[2]
        .parse()
        .map_err(|_| AppError::Parse(format!("delta amount out of range in '{}'", expr)))?;

    let delta = match &caps[3] {
        "h" => Duration::try_hours(amount),
        "m" => Duration::try_minutes(amount),
        other => {
            return Err(AppError::Parse(format!(
                "unsupported delta unit '{}' in '{}' (use 'h' or 'm')",
                other, expr
            )));
        }
    }
    .ok_or_else(|| AppError::Parse(format!("delta out of range in '{}'", expr)))?;

    let shifted = if &caps[1] == "_" {
        now.checked_sub_signed(delta)
    } else {
        now.checked_add_signed(delta)
    };
    shifted.ok_or_else(|| AppError::Parse(format!("delta out of range in '{}'", expr)))
}

/// Parse a time of day against `date`, or a full `YYYY-MM-DD <time>` string.
pub fn parse_date_and_time(time: &str, date: NaiveDate) -> AppResult<NaiveDateTime> {
    let candidate = if time.chars().count() <= BARE_TIME_MAX_LEN {
        format!("{} {}", date.format(DATE_FORMAT), time.to_uppercase())
    } else {
        time.to_string()
    };

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&candidate, fmt).ok())
        .ok_or_else(|| AppError::Parse(format!("could not parse time string '{}'", time)))
}

/// Split `YYYY-MM-DD <time1>-<time2>` into a start and an end on the same date.
/// The order of the two times is not checked.
pub fn parse_junction(junction: &str) -> AppResult<(NaiveDateTime, NaiveDateTime)> {
    let invalid = || AppError::Parse(format!("invalid time range '{}'", junction));

    let parts: Vec<&str> = junction.trim().split(' ').collect();
    let [date_str, range] = parts.as_slice() else {
        return Err(invalid());
    };
    let date = parse_date(date_str)?;

    let times: Vec<&str> = range.split('-').collect();
    let [t1, t2] = times.as_slice() else {
        return Err(invalid());
    };

    Ok((parse_date_and_time(t1, date)?, parse_date_and_time(t2, date)?))
}

/// True when the input looks like a junction (a date followed by a time range).
pub fn is_junction(input: &str) -> bool {
    match input.trim().split_once(' ') {
        Some((date, range)) => parse_date(date).is_ok() && range.contains('-'),
        None => false,
    }
}

pub fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> AppResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .map_err(|_| AppError::Parse(format!("invalid stored timestamp '{}'", s)))
}
