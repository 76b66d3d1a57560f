use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Parses the timestamp formats accepted from clients.
///
/// RFC 3339 timestamps keep their offset, naive date-times are read as UTC
/// and bare dates are midnight UTC. The result is truncated to whole
/// milliseconds, which is the precision the store keeps.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    let parsed = if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        datetime.with_timezone(&Utc)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        Utc.from_utc_datetime(&naive)
    } else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?)
    } else {
        return None;
    };

    truncate_to_millis(parsed)
}

pub fn truncate_to_millis(datetime: DateTime<Utc>) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(datetime.timestamp_millis()).single()
}
