use chrono::NaiveDateTime;

/// A note attached to exactly one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journal {
    pub id: i64,
    pub session_id: i64,
    pub time: NaiveDateTime,
    pub entry: String,
}
