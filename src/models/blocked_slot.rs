//! Blocked time slots (one-off or weekly recurring)

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{enums::DayOfWeek, time_format};
use crate::error::{AppError, AppResult};

/// A time range during which no appointment can take place.
///
/// Exactly one of `specific_date` / `recurring_day_of_week` is set, as selected
/// by `repeating`.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockedTimeSlot {
    pub id: i32,
    pub description: Option<String>,
    #[serde(serialize_with = "time_format::serialize")]
    #[schema(value_type = String, example = "12:00")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "time_format::serialize")]
    #[schema(value_type = String, example = "13:00")]
    pub end_time: NaiveTime,
    pub specific_date: Option<NaiveDate>,
    pub recurring_day_of_week: Option<DayOfWeek>,
    pub repeating: bool,
}

impl BlockedTimeSlot {
    /// Whether this block applies on `date`
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        if self.repeating {
            self.recurring_day_of_week == Some(DayOfWeek::of(date))
        } else {
            self.specific_date == Some(date)
        }
    }
}

/// Create / update request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockedTimeSlotRequest {
    pub description: Option<String>,
    /// Block start (HH:mm)
    pub start_time: String,
    /// Block end (HH:mm)
    pub end_time: String,
    /// Date of a one-off block (YYYY-MM-DD)
    pub specific_date: Option<NaiveDate>,
    pub recurring_day_of_week: Option<DayOfWeek>,
    #[serde(default)]
    pub repeating: bool,
}

/// Validated, normalized block ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedTimeSlotValues {
    pub description: Option<String>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub specific_date: Option<NaiveDate>,
    pub recurring_day_of_week: Option<DayOfWeek>,
    pub repeating: bool,
}

impl BlockedTimeSlotRequest {
    /// Enforce start < end and keep only the field selected by `repeating`
    pub fn into_values(self) -> AppResult<BlockedTimeSlotValues> {
        let start_time = time_format::parse_hhmm(&self.start_time, "startTime")?;
        let end_time = time_format::parse_hhmm(&self.end_time, "endTime")?;
        if start_time >= end_time {
            return Err(AppError::Validation("startTime must be before endTime".to_string()));
        }

        let (specific_date, recurring_day_of_week) = if self.repeating {
            let day = self.recurring_day_of_week.ok_or_else(|| {
                AppError::Validation("recurringDayOfWeek is required for a repeating block".to_string())
            })?;
            (None, Some(day))
        } else {
            let date = self.specific_date.ok_or_else(|| {
                AppError::Validation("specificDate is required for a one-off block".to_string())
            })?;
            (Some(date), None)
        };

        Ok(BlockedTimeSlotValues {
            description: self.description,
            start_time,
            end_time,
            specific_date,
            recurring_day_of_week,
            repeating: self.repeating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(repeating: bool) -> BlockedTimeSlotRequest {
        BlockedTimeSlotRequest {
            description: Some("Lunch".into()),
            start_time: "12:00".into(),
            end_time: "13:00".into(),
            specific_date: NaiveDate::from_ymd_opt(2024, 5, 15),
            recurring_day_of_week: Some(DayOfWeek::Monday),
            repeating,
        }
    }

    #[test]
    fn test_repeating_block_clears_specific_date() {
        let values = request(true).into_values().unwrap();
        assert_eq!(values.specific_date, None);
        assert_eq!(values.recurring_day_of_week, Some(DayOfWeek::Monday));
    }

    #[test]
    fn test_one_off_block_clears_recurring_day() {
        let values = request(false).into_values().unwrap();
        assert_eq!(values.recurring_day_of_week, None);
        assert_eq!(values.specific_date, NaiveDate::from_ymd_opt(2024, 5, 15));
    }

    #[test]
    fn test_missing_discriminant_field() {
        let mut req = request(true);
        req.recurring_day_of_week = None;
        assert!(matches!(req.into_values(), Err(AppError::Validation(_))));

        let mut req = request(false);
        req.specific_date = None;
        assert!(matches!(req.into_values(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_inverted_or_empty_range_rejected() {
        let mut req = request(false);
        req.start_time = "13:00".into();
        req.end_time = "12:00".into();
        assert!(req.into_values().is_err());

        let mut req = request(false);
        req.end_time = "12:00".into();
        assert!(req.into_values().is_err());
    }

    #[test]
    fn test_applies_to() {
        let wednesday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let block = BlockedTimeSlot {
            id: 1,
            description: None,
            start_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            specific_date: None,
            recurring_day_of_week: Some(DayOfWeek::Wednesday),
            repeating: true,
        };
        assert!(block.applies_to(wednesday));
        assert!(block.applies_to(wednesday + chrono::Duration::days(7)));
        assert!(!block.applies_to(wednesday + chrono::Duration::days(1)));
    }
}
