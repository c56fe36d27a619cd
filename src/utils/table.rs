//! Table rendering utilities for CLI outputs.

use crate::models::job::Job;
use crate::models::session::Clok;
use crate::utils::formatting::seconds2hours;
use chrono::NaiveDateTime;
use std::collections::HashMap;

pub struct Column {
    pub header: &'static str,
    pub width: usize,
}

pub struct Table {
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn header(&self) -> String {
        self.line(self.columns.iter().map(|c| c.header.to_string()))
    }

    /// One padded line; cells beyond the last column are dropped.
    pub fn line<I: IntoIterator<Item = String>>(&self, cells: I) -> String {
        let mut out = String::new();
        for (col, cell) in self.columns.iter().zip(cells) {
            out.push_str(&format!("{:<width$} ", cell, width = col.width));
        }
        out.trim_end().to_string()
    }
}

/// Columns of the session listing.
pub fn session_columns() -> Vec<Column> {
    vec![
        Column { header: "ID", width: 6 },
        Column { header: "Job", width: 10 },
        Column { header: "Month", width: 6 },
        Column { header: "Week", width: 6 },
        Column { header: "Date", width: 11 },
        Column { header: "Clock In", width: 12 },
        Column { header: "Clock Out", width: 12 },
        Column { header: "Hours", width: 6 },
    ]
}

/// One listing row; open sessions show the live elapsed time and `(~now)` as clock out.
pub fn session_row(rec: &Clok, jobs: &HashMap<i64, Job>, now: NaiveDateTime) -> Vec<String> {
    let job = jobs
        .get(&rec.job_id)
        .map(|j| j.name.clone())
        .unwrap_or_else(|| format!("#{}", rec.job_id));

    let time_out = match rec.time_out() {
        Some(out) => out.format("%H:%M:%S").to_string(),
        None => format!("(~{})", now.format("%H:%M:%S")),
    };

    vec![
        rec.id.to_string(),
        job,
        rec.month_key().to_string(),
        rec.week_key().to_string(),
        rec.time_in().format("%Y-%m-%d").to_string(),
        rec.time_in().format("%H:%M:%S").to_string(),
        time_out,
        format!("{:.2}", seconds2hours(rec.worked_seconds(now), 2)),
    ]
}
