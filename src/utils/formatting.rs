//! Formatting utilities used for CLI outputs.

pub const SECONDS_PER_HOUR: f64 = 3600.0;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Seconds to hours, rounded to `decimals` places.
pub fn seconds2hours(secs: i64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (secs as f64 / SECONDS_PER_HOUR * factor).round() / factor
}

/// es: 3h 05m, or 0h 00m for nothing
pub fn seconds2readable(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let abs = secs.abs();
    format!("{}{}h {:02}m", sign, abs / 3600, (abs % 3600) / 60)
}
