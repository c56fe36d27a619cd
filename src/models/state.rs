/// The singleton `time_clok_state` row: which job and which session are "current".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveState {
    pub id: i64,
    pub job_id: Option<i64>,
    pub session_id: Option<i64>,
}
