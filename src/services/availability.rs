//! Availability model: working hours and blocked time slots

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{
        appointment::Appointment, blocked_slot::BlockedTimeSlot, enums::DayOfWeek,
        working_hours::WorkingHours,
    },
    repository::Repository,
};

use super::conflicts::ConflictDetector;

/// Length of the intersection of two half-open intervals (zero when disjoint)
pub fn overlap(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> Duration {
    let start = a_start.max(b_start);
    let end = a_end.min(b_end);
    if end > start {
        end - start
    } else {
        Duration::zero()
    }
}

/// Row of `week` for the weekday of `date`
pub fn hours_for(week: &[WorkingHours], date: NaiveDate) -> Option<&WorkingHours> {
    let day = DayOfWeek::of(date);
    week.iter().find(|wh| wh.day_of_week == day)
}

/// Whether `[start, end)` fits inside the opening hours of the day it starts on.
/// Days without a row, closed days and windows running past closing are outside.
pub fn within_working_hours(week: &[WorkingHours], start: NaiveDateTime, end: NaiveDateTime) -> bool {
    let date = start.date();
    match hours_for(week, date).and_then(WorkingHours::span) {
        Some((open, close)) => start >= date.and_time(open) && end <= date.and_time(close),
        None => false,
    }
}

/// Blocks that apply on `date`, as absolute intervals
pub fn blocks_on(blocks: &[BlockedTimeSlot], date: NaiveDate) -> impl Iterator<Item = (NaiveDateTime, NaiveDateTime)> + '_ {
    blocks
        .iter()
        .filter(move |b| b.applies_to(date))
        .map(move |b| (date.and_time(b.start_time), date.and_time(b.end_time)))
}

/// Whether any applicable block intersects `[start, end)` with positive length
pub fn is_blocked(blocks: &[BlockedTimeSlot], start: NaiveDateTime, end: NaiveDateTime) -> bool {
    if end <= start {
        return false;
    }
    let last_day = (end - Duration::nanoseconds(1)).date();
    start
        .date()
        .iter_days()
        .take_while(|d| *d <= last_day)
        .any(|date| blocks_on(blocks, date).any(|(bs, be)| overlap(bs, be, start, end) > Duration::zero()))
}

/// Verdict for a proposed booking
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityCheck {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub within_working_hours: bool,
    pub blocked: bool,
    /// Overlapping non-cancelled appointments
    pub conflicting_appointment_ids: Vec<i32>,
    pub available: bool,
}

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
    conflicts: ConflictDetector,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self {
            conflicts: ConflictDetector::new(repository.clone()),
            repository,
        }
    }

    /// Reject a window outside working hours or inside a blocked slot
    pub async fn ensure_bookable(&self, start: NaiveDateTime, end: NaiveDateTime) -> AppResult<()> {
        let week = self.repository.working_hours.list().await?;
        if !within_working_hours(&week, start, end) {
            return Err(AppError::Validation(format!(
                "{} to {} is outside working hours",
                start, end
            )));
        }
        let blocks = self
            .repository
            .blocked_slots
            .list_applicable_between(start.date(), end.date())
            .await?;
        if is_blocked(&blocks, start, end) {
            return Err(AppError::Validation(format!("{} to {} is blocked", start, end)));
        }
        Ok(())
    }

    /// Working hours, blocks and existing bookings for a service starting at `start`
    pub async fn check(&self, start: NaiveDateTime, service_id: i32) -> AppResult<AvailabilityCheck> {
        let service = self.repository.catalog.get_by_id(service_id).await?;
        let end = service.occupied_until(start)?;

        let week = self.repository.working_hours.list().await?;
        let blocks = self
            .repository
            .blocked_slots
            .list_applicable_between(start.date(), end.date())
            .await?;

        let mut conn = self.repository.pool.acquire().await?;
        let conflicts = self.conflicts.find_conflicts(&mut conn, start, end, None).await?;

        let within = within_working_hours(&week, start, end);
        let blocked = is_blocked(&blocks, start, end);
        let conflicting_appointment_ids: Vec<i32> = conflicts.iter().map(|a: &Appointment| a.id).collect();

        Ok(AvailabilityCheck {
            start,
            end,
            within_working_hours: within,
            blocked,
            available: within && !blocked && conflicting_appointment_ids.is_empty(),
            conflicting_appointment_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::services::fixtures::{at, block, hours};

    fn week() -> Vec<WorkingHours> {
        vec![
            hours(DayOfWeek::Monday, Some(("09:00", "17:00")), false),
            hours(DayOfWeek::Sunday, None, true),
        ]
    }

    #[test]
    fn test_window_inside_hours() {
        // 2024-05-13 is a Monday
        assert!(within_working_hours(&week(), at("2024-05-13 09:00"), at("2024-05-13 17:00")));
        assert!(within_working_hours(&week(), at("2024-05-13 10:00"), at("2024-05-13 11:00")));
        assert!(!within_working_hours(&week(), at("2024-05-13 08:30"), at("2024-05-13 09:30")));
        assert!(!within_working_hours(&week(), at("2024-05-13 16:30"), at("2024-05-13 17:30")));
    }

    #[test]
    fn test_closed_sunday_never_available() {
        let mut w = week();
        // Times left on a closed row must not reopen the day
        w[1].start_time = NaiveTime::from_hms_opt(0, 0, 0);
        w[1].end_time = NaiveTime::from_hms_opt(23, 0, 0);
        for (s, e) in [("00:00", "01:00"), ("10:00", "11:00"), ("22:00", "23:00")] {
            let start = at(&format!("2024-05-19 {}", s));
            let end = at(&format!("2024-05-19 {}", e));
            assert!(!within_working_hours(&w, start, end));
        }
    }

    #[test]
    fn test_day_without_row_is_unavailable() {
        // Tuesday has no row
        assert!(!within_working_hours(&week(), at("2024-05-14 10:00"), at("2024-05-14 11:00")));
    }

    #[test]
    fn test_blocked_needs_positive_overlap() {
        let blocks = vec![block(DayOfWeek::Monday, "12:00", "13:00", true)];
        assert!(is_blocked(&blocks, at("2024-05-13 11:30"), at("2024-05-13 12:30")));
        assert!(is_blocked(&blocks, at("2024-05-13 12:15"), at("2024-05-13 12:45")));
        // Touching edges do not count
        assert!(!is_blocked(&blocks, at("2024-05-13 11:00"), at("2024-05-13 12:00")));
        assert!(!is_blocked(&blocks, at("2024-05-13 13:00"), at("2024-05-13 14:00")));
        // Other weekday
        assert!(!is_blocked(&blocks, at("2024-05-14 12:00"), at("2024-05-14 13:00")));
    }

    #[test]
    fn test_one_off_block_only_on_its_date() {
        let mut b = block(DayOfWeek::Monday, "12:00", "13:00", false);
        b.specific_date = NaiveDate::from_ymd_opt(2024, 5, 13);
        b.recurring_day_of_week = None;
        let blocks = vec![b];
        assert!(is_blocked(&blocks, at("2024-05-13 12:00"), at("2024-05-13 12:30")));
        assert!(!is_blocked(&blocks, at("2024-05-20 12:00"), at("2024-05-20 12:30")));
    }

    #[test]
    fn test_overlap_length() {
        let d = overlap(at("2024-05-13 09:00"), at("2024-05-13 10:00"), at("2024-05-13 09:45"), at("2024-05-13 11:00"));
        assert_eq!(d.num_minutes(), 15);
        let none = overlap(at("2024-05-13 09:00"), at("2024-05-13 10:00"), at("2024-05-13 10:00"), at("2024-05-13 11:00"));
        assert_eq!(none, Duration::zero());
    }
}
