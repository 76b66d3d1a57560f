use chrono::{DateTime, Utc};

use super::{error::ApiError, timestamp::parse_timestamp};

/// An inclusive window over transaction `datetime`s.
///
/// `start` after `end` is allowed and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DateRange {
        DateRange { start, end }
    }

    /// Builds a range from the raw `start` and `end` query parameters.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<DateRange, ApiError> {
        let (start, end) = match (non_blank(start), non_blank(end)) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(ApiError::InvalidRange(String::from(
                    "Start and end dates are required",
                )))
            }
        };

        let start = parse_timestamp(start).ok_or_else(|| {
            ApiError::InvalidRange(format!("Start date '{}' is not a valid date", start))
        })?;
        let end = parse_timestamp(end).ok_or_else(|| {
            ApiError::InvalidRange(format!("End date '{}' is not a valid date", end))
        })?;

        Ok(DateRange { start, end })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
