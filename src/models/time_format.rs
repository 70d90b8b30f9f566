//! "HH:mm" parsing and serialization for time-of-day fields

use chrono::NaiveTime;
use serde::Serializer;

use crate::error::{AppError, AppResult};

/// Parse a time of day given as "HH:mm" (seconds are accepted and kept)
pub fn parse_hhmm(value: &str, field: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:mm)", field)))
}

pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.format("%H:%M").to_string())
}

pub mod option {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => super::serialize(t, serializer),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:30", "start_time").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(parse_hhmm("17:00:00", "end_time").unwrap(), NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert!(matches!(parse_hhmm("25:00", "start_time"), Err(AppError::Validation(_))));
        assert!(parse_hhmm("nine", "start_time").is_err());
    }
}
