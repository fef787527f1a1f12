use chrono::{DateTime, Utc};

/// Get the current instant in UTC.
///
/// All timestamps in the system (message creation, presence activity,
/// liveness cutoffs) are computed from this single clock.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
