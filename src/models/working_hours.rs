//! Weekly working hours (one row per weekday)

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{enums::DayOfWeek, time_format};
use crate::error::{AppError, AppResult};

/// Opening hours for one weekday
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkingHours {
    pub id: i32,
    pub day_of_week: DayOfWeek,
    #[serde(serialize_with = "time_format::option::serialize")]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub start_time: Option<NaiveTime>,
    #[serde(serialize_with = "time_format::option::serialize")]
    #[schema(value_type = Option<String>, example = "17:00")]
    pub end_time: Option<NaiveTime>,
    pub is_closed: bool,
}

impl WorkingHours {
    /// Opening span, or None when the day is closed or incomplete
    pub fn span(&self) -> Option<(NaiveTime, NaiveTime)> {
        if self.is_closed {
            return None;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start < end => Some((start, end)),
            _ => None,
        }
    }
}

/// Upsert request for a weekday
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertWorkingHours {
    pub day_of_week: DayOfWeek,
    /// Opening time (HH:mm)
    pub start_time: Option<String>,
    /// Closing time (HH:mm)
    pub end_time: Option<String>,
    #[serde(default)]
    pub is_closed: bool,
}

/// Validated working hours ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingHoursValues {
    pub day_of_week: DayOfWeek,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub is_closed: bool,
}

impl UpsertWorkingHours {
    /// Closed days drop their times; open days need start < end.
    pub fn into_values(self) -> AppResult<WorkingHoursValues> {
        if self.is_closed {
            return Ok(WorkingHoursValues {
                day_of_week: self.day_of_week,
                start_time: None,
                end_time: None,
                is_closed: true,
            });
        }

        let start = self
            .start_time
            .as_deref()
            .ok_or_else(|| AppError::Validation("startTime is required for an open day".to_string()))?;
        let end = self
            .end_time
            .as_deref()
            .ok_or_else(|| AppError::Validation("endTime is required for an open day".to_string()))?;
        let start = time_format::parse_hhmm(start, "startTime")?;
        let end = time_format::parse_hhmm(end, "endTime")?;

        if start >= end {
            return Err(AppError::Validation("startTime must be before endTime".to_string()));
        }

        Ok(WorkingHoursValues {
            day_of_week: self.day_of_week,
            start_time: Some(start),
            end_time: Some(end),
            is_closed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_day_clears_times() {
        let req = UpsertWorkingHours {
            day_of_week: DayOfWeek::Sunday,
            start_time: Some("09:00".into()),
            end_time: Some("12:00".into()),
            is_closed: true,
        };
        let values = req.into_values().unwrap();
        assert!(values.is_closed);
        assert_eq!(values.start_time, None);
        assert_eq!(values.end_time, None);
    }

    #[test]
    fn test_open_day_requires_ordered_times() {
        let req = UpsertWorkingHours {
            day_of_week: DayOfWeek::Monday,
            start_time: Some("17:00".into()),
            end_time: Some("09:00".into()),
            is_closed: false,
        };
        assert!(matches!(req.into_values(), Err(AppError::Validation(_))));

        let missing = UpsertWorkingHours {
            day_of_week: DayOfWeek::Monday,
            start_time: Some("09:00".into()),
            end_time: None,
            is_closed: false,
        };
        assert!(missing.into_values().is_err());
    }

    #[test]
    fn test_span_of_closed_day_is_none() {
        let hours = WorkingHours {
            id: 1,
            day_of_week: DayOfWeek::Sunday,
            start_time: Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            end_time: Some(NaiveTime::from_hms_opt(17, 0, 0).unwrap()),
            is_closed: true,
        };
        assert_eq!(hours.span(), None);
    }

    #[test]
    fn test_serialized_as_hhmm() {
        let hours = WorkingHours {
            id: 1,
            day_of_week: DayOfWeek::Monday,
            start_time: Some(NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
            end_time: Some(NaiveTime::from_hms_opt(17, 30, 0).unwrap()),
            is_closed: false,
        };
        let json = serde_json::to_value(&hours).unwrap();
        assert_eq!(json["dayOfWeek"], "MONDAY");
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["endTime"], "17:30");
    }
}
