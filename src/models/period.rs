use crate::errors::{AppError, AppResult};
use crate::utils::date::{self, PeriodKeys};
use chrono::NaiveDateTime;
use clap::ValueEnum;
use std::fmt;
use std::str::FromStr;

/// Which denormalized key a period query filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PeriodKind {
    Day,
    Week,
    Month,
}

impl PeriodKind {
    /// Column of `time_clok` holding this kind of key.
    pub fn column(&self) -> &'static str {
        match self {
            PeriodKind::Day => "date_key",
            PeriodKind::Week => "week_key",
            PeriodKind::Month => "month_key",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Day => "day",
            PeriodKind::Week => "week",
            PeriodKind::Month => "month",
        }
    }

    /// Pick this kind's key out of a set of derived keys.
    pub fn select(&self, keys: &PeriodKeys) -> i64 {
        match self {
            PeriodKind::Day => keys.date_key,
            PeriodKind::Week => keys.week_key,
            PeriodKind::Month => keys.month_key,
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(PeriodKind::Day),
            "week" => Ok(PeriodKind::Week),
            "month" => Ok(PeriodKind::Month),
            other => Err(AppError::Parse(format!(
                "period must be one of (day, week, month), not '{}'",
                other
            ))),
        }
    }
}

/// A period key as given by the caller: explicit, or "the period containing now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeriodKey {
    Explicit(i64),
    #[default]
    Default,
}

impl PeriodKey {
    /// Parse a CLI key. Day keys also accept a `YYYY-MM-DD` date.
    pub fn parse(kind: PeriodKind, raw: Option<&str>) -> AppResult<Self> {
        let Some(raw) = raw.map(str::trim) else {
            return Ok(PeriodKey::Default);
        };

        if kind == PeriodKind::Day && raw.contains('-') {
            return Ok(PeriodKey::Explicit(date::date_key_of(&date::parse_date(raw)?)));
        }

        let key: i64 = raw
            .parse()
            .map_err(|_| AppError::Parse(format!("invalid {} key '{}'", kind, raw)))?;

        let valid = match kind {
            PeriodKind::Day => (10_101..=99_991_231).contains(&key),
            PeriodKind::Week => (0..=53).contains(&key),
            PeriodKind::Month => (1..=12).contains(&key),
        };
        if !valid {
            return Err(AppError::Parse(format!("{} key {} is out of range", kind, key)));
        }

        Ok(PeriodKey::Explicit(key))
    }

    /// Resolve to a concrete integer key; `Default` means the period containing `now`.
    pub fn resolve(&self, kind: PeriodKind, now: NaiveDateTime) -> i64 {
        match self {
            PeriodKey::Explicit(k) => *k,
            PeriodKey::Default => kind.select(&PeriodKeys::derive(&now)),
        }
    }
}
