//! Shared domain enums

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// DayOfWeek
// ---------------------------------------------------------------------------

/// Day of week, stored as SMALLINT (0=Monday, 6=Sunday)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum DayOfWeek {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

impl DayOfWeek {
    /// Monday-first ordering
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    /// Day name in the given locale
    pub fn display_name(&self, locale: Locale) -> &'static str {
        let idx = *self as usize;
        match locale {
            Locale::En => ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"][idx],
            Locale::De => ["Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag", "Sonntag"][idx],
            Locale::Fr => ["lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche"][idx],
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(w: Weekday) -> Self {
        match w {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl std::fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name(Locale::En).to_uppercase())
    }
}

// ---------------------------------------------------------------------------
// Locale
// ---------------------------------------------------------------------------

/// Language used for human-readable labels in statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
    Fr,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_date() {
        // 2024-05-15 is a Wednesday
        let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert_eq!(DayOfWeek::of(date), DayOfWeek::Wednesday);
    }

    #[test]
    fn test_localized_names() {
        assert_eq!(DayOfWeek::Monday.display_name(Locale::De), "Montag");
        assert_eq!(DayOfWeek::Sunday.display_name(Locale::Fr), "dimanche");
        assert_eq!(DayOfWeek::Friday.to_string(), "FRIDAY");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&DayOfWeek::Saturday).unwrap();
        assert_eq!(json, "\"SATURDAY\"");
        let day: DayOfWeek = serde_json::from_str("\"TUESDAY\"").unwrap();
        assert_eq!(day, DayOfWeek::Tuesday);
    }
}
