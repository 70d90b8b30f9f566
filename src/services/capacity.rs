//! Capacity and utilization per day

use chrono::NaiveDate;

use crate::{
    api::stats::{DayUtilization, UtilizationResponse},
    error::AppResult,
    models::{
        appointment::Appointment, blocked_slot::BlockedTimeSlot, user::RequestContext,
        working_hours::WorkingHours,
    },
    repository::Repository,
};

use super::{
    availability::{blocks_on, hours_for, overlap},
    metrics::{round_to, StatsPeriod},
};

/// Opening minutes of `date` left after blocked slots, never negative
pub fn available_minutes(week: &[WorkingHours], blocks: &[BlockedTimeSlot], date: NaiveDate) -> i64 {
    let Some((open, close)) = hours_for(week, date).and_then(WorkingHours::span) else {
        return 0;
    };
    let (start, end) = (date.and_time(open), date.and_time(close));
    let blocked: i64 = blocks_on(blocks, date)
        .map(|(bs, be)| overlap(bs, be, start, end).num_minutes())
        .sum();
    ((end - start).num_minutes() - blocked).max(0)
}

/// Minutes of non-cancelled appointments starting on `date`
pub fn booked_minutes(appointments: &[Appointment], date: NaiveDate) -> i64 {
    appointments
        .iter()
        .filter(|a| a.status.is_active() && a.start_time.date() == date)
        .map(Appointment::duration_minutes)
        .sum()
}

/// Booked over available in percent, two decimals; 0 when nothing is available
pub fn utilization_percentage(booked: i64, available: i64) -> f64 {
    if available <= 0 {
        return 0.0;
    }
    round_to(booked as f64 / available as f64 * 100.0, 2)
}

pub fn utilization(
    week: &[WorkingHours],
    blocks: &[BlockedTimeSlot],
    appointments: &[Appointment],
    period: &StatsPeriod,
) -> UtilizationResponse {
    let days: Vec<DayUtilization> = period
        .dates()
        .map(|date| DayUtilization {
            date,
            available_minutes: available_minutes(week, blocks, date),
            booked_minutes: booked_minutes(appointments, date),
        })
        .collect();

    let available: i64 = days.iter().map(|d| d.available_minutes).sum();
    let booked: i64 = days.iter().map(|d| d.booked_minutes).sum();

    UtilizationResponse {
        start_date: period.start,
        end_date: period.end,
        available_minutes: available,
        booked_minutes: booked,
        utilization_percentage: utilization_percentage(booked, available),
        days,
    }
}

#[derive(Clone)]
pub struct CapacityService {
    repository: Repository,
}

impl CapacityService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn utilization(
        &self,
        ctx: &RequestContext,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<UtilizationResponse> {
        ctx.require_admin()?;
        let period = StatsPeriod::new(start, end)?;

        let week = self.repository.working_hours.list().await?;
        let blocks = self
            .repository
            .blocked_slots
            .list_applicable_between(period.start, period.end)
            .await?;
        let appointments = self
            .repository
            .appointments
            .list_starting_between(period.start_time(), period.end_exclusive()?)
            .await?;

        Ok(utilization(&week, &blocks, &appointments, &period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{enums::DayOfWeek, AppointmentStatus};
    use crate::services::fixtures::{appointment, block, date, hours};

    #[test]
    fn test_monday_with_lunch_block() {
        // 2024-05-13 is a Monday
        let week = vec![hours(DayOfWeek::Monday, Some(("09:00", "17:00")), false)];
        let blocks = vec![block(DayOfWeek::Monday, "12:00", "13:00", true)];
        let list = vec![appointment(1, "2024-05-13 10:00", 60, AppointmentStatus::Active, 1)];
        let period = StatsPeriod::day(date("2024-05-13"));

        let report = utilization(&week, &blocks, &list, &period);
        assert_eq!(report.available_minutes, 420);
        assert_eq!(report.booked_minutes, 60);
        assert_eq!(report.utilization_percentage, 14.29);
    }

    #[test]
    fn test_blocks_are_clipped_to_opening_hours() {
        let week = vec![hours(DayOfWeek::Monday, Some(("09:00", "17:00")), false)];
        let blocks = vec![
            block(DayOfWeek::Monday, "07:00", "10:00", true),
            block(DayOfWeek::Monday, "16:30", "19:00", true),
        ];
        assert_eq!(available_minutes(&week, &blocks, date("2024-05-13")), 480 - 60 - 30);
    }

    #[test]
    fn test_fully_blocked_day_floors_at_zero() {
        let week = vec![hours(DayOfWeek::Monday, Some(("09:00", "17:00")), false)];
        let blocks = vec![
            block(DayOfWeek::Monday, "08:00", "18:00", true),
            block(DayOfWeek::Monday, "12:00", "13:00", true),
        ];
        assert_eq!(available_minutes(&week, &blocks, date("2024-05-13")), 0);
    }

    #[test]
    fn test_no_capacity_gives_zero_percent() {
        let week = vec![hours(DayOfWeek::Sunday, None, true)];
        let list = vec![appointment(1, "2024-05-19 10:00", 60, AppointmentStatus::Active, 1)];
        let report = utilization(&week, &[], &list, &StatsPeriod::day(date("2024-05-19")));
        assert_eq!(report.available_minutes, 0);
        assert_eq!(report.booked_minutes, 60);
        assert_eq!(report.utilization_percentage, 0.0);
    }

    #[test]
    fn test_cancelled_not_booked() {
        let list = vec![
            appointment(1, "2024-05-13 10:00", 60, AppointmentStatus::Cancelled, 1),
            appointment(2, "2024-05-13 11:00", 30, AppointmentStatus::Confirmed, 1),
        ];
        assert_eq!(booked_minutes(&list, date("2024-05-13")), 30);
    }
}
