use chrono::{DateTime, Duration, Utc};

pub const EDIT_WINDOW_HOURS: i64 = 12;

/// The oldest `datetime` a transaction may carry and still be updated at
/// `now`.
pub fn edit_deadline(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::hours(EDIT_WINDOW_HOURS)
}

/// Whether a transaction dated `datetime` may still be updated at `now`.
///
/// Nothing about this is stored on the record, it is recomputed for every
/// update request. Transactions dated in the future are always editable.
pub fn is_editable(datetime: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    datetime >= edit_deadline(now)
}
