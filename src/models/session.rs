use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    #[serde(skip)]
    pub checkpoint_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_mins: Option<i64>,
    pub notes: Option<String>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Minutes elapsed between the session start and `now`, rounded.
    pub fn minutes_until(&self, now: DateTime<Utc>) -> i64 {
        duration_mins(self.started_at, now)
    }
}

/// `round((end - start) / 60000)` on millisecond timestamps. Clock skew never
/// produces a negative duration.
pub fn duration_mins(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> i64 {
    let millis = (ended_at - started_at).num_milliseconds();
    ((millis as f64) / 60_000.0).round().max(0.0) as i64
}
