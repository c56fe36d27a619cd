//! Period keys: the denormalized day / week / month integers stored on every session.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `YYYYMMDD` as an integer, e.g. `20200901`.
pub fn date_key(t: &NaiveDateTime) -> i64 {
    date_key_of(&t.date())
}

pub fn date_key_of(d: &NaiveDate) -> i64 {
    d.year() as i64 * 10_000 + d.month() as i64 * 100 + d.day() as i64
}

/// Week of the year with Sunday as the first day of the week (`%U`).
/// Days before the first Sunday of the year are in week 0.
pub fn week_key(t: &NaiveDateTime) -> i64 {
    let yday = t.ordinal0() as i64;
    let wday = t.weekday().num_days_from_sunday() as i64;
    (yday + 7 - wday) / 7
}

/// Month number, 1..=12.
pub fn month_key(t: &NaiveDateTime) -> i64 {
    t.month() as i64
}

/// The three keys derived together from one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodKeys {
    pub date_key: i64,
    pub week_key: i64,
    pub month_key: i64,
}

impl PeriodKeys {
    pub fn derive(t: &NaiveDateTime) -> Self {
        Self {
            date_key: date_key(t),
            week_key: week_key(t),
            month_key: month_key(t),
        }
    }
}

pub fn parse_date(s: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| AppError::Parse(format!("invalid date '{}', expected YYYY-MM-DD", s)))
}
