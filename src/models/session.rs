use super::journal::Journal;
use crate::utils::date::PeriodKeys;
use chrono::NaiveDateTime;

/// One clock-in / clock-out span ("clok").
///
/// `time_in` and the period keys are private: the keys are derived from
/// `time_in` and can only change together with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clok {
    pub id: i64,     // ⇔ time_clok.id (0 until inserted)
    pub job_id: i64, // ⇔ time_clok.job_id
    time_in: NaiveDateTime,
    time_out: Option<NaiveDateTime>,
    time_span: i64, // seconds, frozen on close
    keys: PeriodKeys,
    pub journal: Vec<Journal>,
}

impl Clok {
    /// A new open session starting at `time_in`.
    pub fn open(job_id: i64, time_in: NaiveDateTime) -> Self {
        Self {
            id: 0,
            job_id,
            time_in,
            time_out: None,
            time_span: 0,
            keys: PeriodKeys::derive(&time_in),
            journal: Vec::new(),
        }
    }

    /// A session created directly in the closed state.
    pub fn closed(job_id: i64, time_in: NaiveDateTime, time_out: NaiveDateTime) -> Self {
        let mut c = Self::open(job_id, time_in);
        c.close(time_out);
        c
    }

    /// Rebuild a session from stored columns, keeping the stored keys as they are
    /// so that drift can be detected (see [`Clok::keys_are_current`]).
    pub fn from_stored(
        id: i64,
        job_id: i64,
        time_in: NaiveDateTime,
        time_out: Option<NaiveDateTime>,
        time_span: i64,
        keys: PeriodKeys,
    ) -> Self {
        Self {
            id,
            job_id,
            time_in,
            time_out,
            time_span,
            keys,
            journal: Vec::new(),
        }
    }

    pub fn time_in(&self) -> NaiveDateTime {
        self.time_in
    }

    pub fn time_out(&self) -> Option<NaiveDateTime> {
        self.time_out
    }

    pub fn time_span(&self) -> i64 {
        self.time_span
    }

    pub fn date_key(&self) -> i64 {
        self.keys.date_key
    }

    pub fn week_key(&self) -> i64 {
        self.keys.week_key
    }

    pub fn month_key(&self) -> i64 {
        self.keys.month_key
    }

    pub fn is_open(&self) -> bool {
        self.time_out.is_none()
    }

    /// Move the start of the session; keys and span follow.
    pub fn set_time_in(&mut self, time_in: NaiveDateTime) {
        self.time_in = time_in;
        self.keys = PeriodKeys::derive(&time_in);
        self.update_span();
    }

    /// Set `time_out` and freeze the span.
    pub fn close(&mut self, time_out: NaiveDateTime) {
        self.time_out = Some(time_out);
        self.update_span();
    }

    fn update_span(&mut self) {
        if let Some(out) = self.time_out {
            self.time_span = (out - self.time_in).num_seconds();
        }
    }

    /// Seconds since clock-in for an open session, `None` once closed.
    pub fn elapsed_seconds(&self, now: NaiveDateTime) -> Option<i64> {
        self.is_open().then(|| (now - self.time_in).num_seconds())
    }

    /// Seconds to count toward hour totals: the frozen span, or live elapsed time.
    pub fn worked_seconds(&self, now: NaiveDateTime) -> i64 {
        self.elapsed_seconds(now).unwrap_or(self.time_span)
    }

    pub fn keys_are_current(&self) -> bool {
        self.keys == PeriodKeys::derive(&self.time_in)
    }

    pub fn span_is_current(&self) -> bool {
        match self.time_out {
            Some(out) => self.time_span == (out - self.time_in).num_seconds(),
            None => true,
        }
    }

    /// Re-derive keys and span from the timestamps.
    pub fn recompute(&mut self) {
        let t = self.time_in;
        self.set_time_in(t);
    }
}
