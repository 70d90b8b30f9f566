//! Derived booking metrics over inclusive date periods.
//!
//! Everything here works on appointments already loaded from the database,
//! so the arithmetic can be tested without one. Unless stated otherwise,
//! cancelled appointments are left out.

use std::collections::HashSet;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};
use indexmap::IndexMap;
use rust_decimal::Decimal;

use crate::{
    config::RevenueMode,
    error::{AppError, AppResult},
    models::{appointment::Appointment, enums::DayOfWeek, working_hours::WorkingHours},
};

/// Opening hours assumed by the hourly histogram when none are configured
pub const DEFAULT_OPENING_HOUR: u32 = 8;
pub const DEFAULT_CLOSING_HOUR: u32 = 20;

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Relative change in percent.
///
/// Both zero gives 0.0, a zero previous value gives None. The ratio is
/// rounded to four places before scaling, so 150 over 100 is exactly 50.0.
pub fn calculate_percentage_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return if current == 0.0 { Some(0.0) } else { None };
    }
    let ratio = (current - previous) / previous;
    Some((ratio * 10_000.0).round() / 100.0)
}

/// `part / whole` in percent with two decimals, None for an empty whole
pub fn share_percentage(part: i64, whole: i64) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(round_to(part as f64 / whole as f64 * 100.0, 2))
    }
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// `date` moved by `days`, or a validation error past the calendar limits
fn shift_days(date: NaiveDate, days: i64) -> AppResult<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| AppError::Validation(format!("Date {} is out of the supported range", date)))
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StatsPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        if end < start {
            return Err(AppError::Validation(format!(
                "endDate {} is before startDate {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn day(date: NaiveDate) -> Self {
        Self { start: date, end: date }
    }

    /// Monday to Sunday of the ISO week containing `date`
    pub fn iso_week(date: NaiveDate) -> AppResult<Self> {
        let offset = date.weekday().num_days_from_monday() as i64;
        let start = shift_days(date, -offset)?;
        Ok(Self {
            start,
            end: shift_days(start, 6)?,
        })
    }

    /// Calendar month containing `date`
    pub fn month(date: NaiveDate) -> AppResult<Self> {
        let first = shift_days(date, -(date.day0() as i64))?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| AppError::Validation(format!("Date {} is out of the supported range", date)))?;
        Ok(Self {
            start: first,
            end: shift_days(next, -1)?,
        })
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Period of equal length ending the day before this one starts
    pub fn previous(&self) -> AppResult<Self> {
        Ok(Self {
            start: shift_days(self.start, -self.days())?,
            end: shift_days(self.start, -1)?,
        })
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start.and_time(chrono::NaiveTime::MIN)
    }

    /// Midnight after the last day
    pub fn end_exclusive(&self) -> AppResult<NaiveDateTime> {
        Ok(shift_days(self.end, 1)?.and_time(chrono::NaiveTime::MIN))
    }

    pub fn contains(&self, time: NaiveDateTime) -> bool {
        let date = time.date();
        date >= self.start && date <= self.end
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }

    /// Smallest period covering both
    pub fn union(&self, other: &StatsPeriod) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Aggregates of one period
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodTotals {
    /// Non-cancelled appointments
    pub count: i64,
    pub cancelled: i64,
    pub revenue: Decimal,
    pub unique_customers: i64,
    pub booked_minutes: i64,
}

fn active_in<'a>(
    appointments: &'a [Appointment],
    period: &'a StatsPeriod,
) -> impl Iterator<Item = &'a Appointment> + 'a {
    appointments
        .iter()
        .filter(move |a| period.contains(a.start_time) && a.status.is_active())
}

pub fn totals(appointments: &[Appointment], period: &StatsPeriod, mode: RevenueMode) -> PeriodTotals {
    let mut totals = PeriodTotals::default();
    let mut customers = HashSet::new();

    for a in appointments.iter().filter(|a| period.contains(a.start_time)) {
        if !a.status.is_active() {
            totals.cancelled += 1;
            continue;
        }
        totals.count += 1;
        totals.revenue += a.revenue(mode);
        totals.booked_minutes += a.duration_minutes();
        customers.insert(a.customer.id);
    }

    totals.unique_customers = customers.len() as i64;
    totals
}

impl PeriodTotals {
    /// Booked minutes per appointment
    pub fn average_duration(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(round_to(self.booked_minutes as f64 / self.count as f64, 2))
        }
    }

    /// Cancelled over all appointments of the period, in percent
    pub fn cancellation_rate(&self) -> Option<f64> {
        share_percentage(self.cancelled, self.cancelled + self.count)
    }
}

/// Percentage of the period's customers who registered within the period
pub fn new_customer_share(appointments: &[Appointment], period: &StatsPeriod) -> Option<f64> {
    let mut seen = HashSet::new();
    let mut new_customers = 0;
    for a in active_in(appointments, period) {
        if seen.insert(a.customer.id) && period.contains(a.customer.registered_at) {
            new_customers += 1;
        }
    }
    share_percentage(new_customers, seen.len() as i64)
}

/// Average whole days between booking and start, rounded
pub fn average_lead_time_days(appointments: &[Appointment], period: &StatsPeriod) -> Option<i64> {
    let leads: Vec<i64> = active_in(appointments, period)
        .map(|a| (a.start_time - a.created_at).num_days())
        .collect();
    if leads.is_empty() {
        return None;
    }
    let avg = leads.iter().sum::<i64>() as f64 / leads.len() as f64;
    Some(avg.round() as i64)
}

/// Daily average revenue of the period extended to 30 days
pub fn projected_revenue_30_days(revenue: Decimal, days_in_period: i64) -> Decimal {
    if days_in_period <= 0 {
        return Decimal::ZERO;
    }
    (revenue / Decimal::from(days_in_period) * Decimal::from(30)).round_dp(2)
}

// ---------------------------------------------------------------------------
// Breakdowns
// ---------------------------------------------------------------------------

/// Appointment counts per weekday, Monday first
pub fn day_of_week_counts(appointments: &[Appointment], period: &StatsPeriod) -> [(DayOfWeek, i64); 7] {
    let mut counts = DayOfWeek::ALL.map(|d| (d, 0));
    for a in active_in(appointments, period) {
        counts[DayOfWeek::of(a.start_time.date()) as usize].1 += 1;
    }
    counts
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceCount {
    pub service_id: i32,
    pub service_name: String,
    pub count: i64,
    /// Share of all appointments in the period
    pub percentage: f64,
}

/// Services by number of appointments, ties kept in order of first
/// appearance, truncated to `top_n`. Returns the period total as well.
pub fn service_counts(
    appointments: &[Appointment],
    period: &StatsPeriod,
    top_n: usize,
) -> (i64, Vec<ServiceCount>) {
    let mut by_service: IndexMap<i32, (String, i64)> = IndexMap::new();
    for a in active_in(appointments, period) {
        by_service
            .entry(a.service.id)
            .or_insert_with(|| (a.service.name.clone(), 0))
            .1 += 1;
    }

    let total: i64 = by_service.values().map(|(_, c)| c).sum();
    let mut rows: Vec<ServiceCount> = by_service
        .into_iter()
        .map(|(service_id, (service_name, count))| ServiceCount {
            service_id,
            service_name,
            count,
            percentage: share_percentage(count, total).unwrap_or(0.0),
        })
        .collect();

    // stable: equal counts keep insertion order
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows.truncate(top_n);
    (total, rows)
}

/// `[first, last)` hours covered by any open day, or 08-20 without hours
pub fn hour_bounds(week: &[WorkingHours]) -> (u32, u32) {
    let spans: Vec<_> = week.iter().filter_map(WorkingHours::span).collect();
    let first = spans.iter().map(|(open, _)| open.hour()).min();
    let last = spans
        .iter()
        .map(|(_, close)| {
            if close.minute() > 0 || close.second() > 0 {
                close.hour() + 1
            } else {
                close.hour()
            }
        })
        .max();

    match (first, last) {
        (Some(first), Some(last)) if first < last => (first, last),
        _ => (DEFAULT_OPENING_HOUR, DEFAULT_CLOSING_HOUR),
    }
}

/// Appointments per starting hour within the opening-hours bounds
pub fn hourly_counts(appointments: &[Appointment], period: &StatsPeriod, week: &[WorkingHours]) -> Vec<(u32, i64)> {
    let (first, last) = hour_bounds(week);
    let mut counts: Vec<(u32, i64)> = (first..last).map(|h| (h, 0)).collect();
    for a in active_in(appointments, period) {
        let hour = a.start_time.hour();
        if (first..last).contains(&hour) {
            counts[(hour - first) as usize].1 += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppointmentStatus;
    use crate::services::fixtures::{appointment, at, date, hours};

    fn may() -> StatsPeriod {
        StatsPeriod::new(date("2024-05-01"), date("2024-05-31")).unwrap()
    }

    #[test]
    fn test_percentage_change() {
        assert_eq!(calculate_percentage_change(0.0, 0.0), Some(0.0));
        assert_eq!(calculate_percentage_change(5.0, 0.0), None);
        assert_eq!(calculate_percentage_change(150.0, 100.0), Some(50.0));
        assert_eq!(calculate_percentage_change(50.0, 100.0), Some(-50.0));
        // 1/3 rounds to 0.3333 before scaling
        assert_eq!(calculate_percentage_change(4.0, 3.0), Some(33.33));
        assert_eq!(calculate_percentage_change(0.0, 10.0), Some(-100.0));
    }

    #[test]
    fn test_inverted_period_rejected() {
        let err = StatsPeriod::new(date("2024-05-10"), date("2024-05-01")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(StatsPeriod::new(date("2024-05-01"), date("2024-05-01")).is_ok());
    }

    #[test]
    fn test_previous_period_has_same_length() {
        let p = StatsPeriod::new(date("2024-05-11"), date("2024-05-20")).unwrap();
        let prev = p.previous().unwrap();
        assert_eq!(prev.start, date("2024-05-01"));
        assert_eq!(prev.end, date("2024-05-10"));
        assert_eq!(prev.days(), p.days());
    }

    #[test]
    fn test_calendar_limits_are_validation_errors() {
        let first = StatsPeriod::new(NaiveDate::MIN, NaiveDate::MIN).unwrap();
        assert!(matches!(first.previous(), Err(AppError::Validation(_))));

        let last = StatsPeriod::new(NaiveDate::MAX, NaiveDate::MAX).unwrap();
        assert!(matches!(last.end_exclusive(), Err(AppError::Validation(_))));
        assert!(matches!(StatsPeriod::month(NaiveDate::MAX), Err(AppError::Validation(_))));

        // Either outcome is fine at the edges, as long as nothing panics
        let _ = StatsPeriod::iso_week(NaiveDate::MIN);
        let _ = StatsPeriod::iso_week(NaiveDate::MAX);
    }

    #[test]
    fn test_end_exclusive_is_next_midnight() {
        let p = StatsPeriod::new(date("2024-05-01"), date("2024-05-31")).unwrap();
        assert_eq!(p.end_exclusive().unwrap(), at("2024-06-01 00:00"));
    }

    #[test]
    fn test_week_and_month_buckets() {
        let week = StatsPeriod::iso_week(date("2024-05-15")).unwrap();
        assert_eq!(week.start, date("2024-05-13"));
        assert_eq!(week.end, date("2024-05-19"));

        let feb = StatsPeriod::month(date("2024-02-10")).unwrap();
        assert_eq!(feb.start, date("2024-02-01"));
        assert_eq!(feb.end, date("2024-02-29"));
        let dec = StatsPeriod::month(date("2023-12-31")).unwrap();
        assert_eq!(dec.end, date("2023-12-31"));
    }

    #[test]
    fn test_cancellation_rate() {
        let mut list = Vec::new();
        for i in 0..8 {
            list.push(appointment(i, "2024-05-10 10:00", 30, AppointmentStatus::Active, 1));
        }
        for i in 8..10 {
            list.push(appointment(i, "2024-05-11 10:00", 30, AppointmentStatus::Cancelled, 2));
        }
        let t = totals(&list, &may(), RevenueMode::LivePrice);
        assert_eq!(t.count, 8);
        assert_eq!(t.cancelled, 2);
        assert_eq!(t.cancellation_rate(), Some(20.0));
    }

    #[test]
    fn test_empty_period() {
        let t = totals(&[], &may(), RevenueMode::LivePrice);
        assert_eq!(t.count, 0);
        assert_eq!(t.revenue, Decimal::ZERO);
        assert_eq!(t.average_duration(), None);
        assert_eq!(t.cancellation_rate(), None);
        assert_eq!(new_customer_share(&[], &may()), None);
        assert_eq!(average_lead_time_days(&[], &may()), None);
    }

    #[test]
    fn test_totals_skip_cancelled_and_other_periods() {
        let list = vec![
            appointment(1, "2024-05-02 09:00", 60, AppointmentStatus::Active, 1),
            appointment(2, "2024-05-03 09:00", 30, AppointmentStatus::Completed, 1),
            appointment(3, "2024-05-04 09:00", 30, AppointmentStatus::Cancelled, 2),
            appointment(4, "2024-06-01 09:00", 30, AppointmentStatus::Active, 3),
        ];
        let t = totals(&list, &may(), RevenueMode::LivePrice);
        assert_eq!(t.count, 2);
        assert_eq!(t.unique_customers, 1);
        assert_eq!(t.booked_minutes, 90);
        assert_eq!(t.average_duration(), Some(45.0));
        assert_eq!(t.revenue, Decimal::new(5000, 2));
    }

    #[test]
    fn test_revenue_mode() {
        let mut a = appointment(1, "2024-05-02 09:00", 60, AppointmentStatus::Active, 1);
        a.booked_price = Some(Decimal::new(2000, 2));
        let live = totals(&[a.clone()], &may(), RevenueMode::LivePrice);
        let booked = totals(&[a], &may(), RevenueMode::BookedPrice);
        assert_eq!(live.revenue, Decimal::new(2500, 2));
        assert_eq!(booked.revenue, Decimal::new(2000, 2));
    }

    #[test]
    fn test_new_customer_share() {
        let mut returning = appointment(1, "2024-05-02 09:00", 60, AppointmentStatus::Active, 1);
        returning.customer.registered_at = at("2024-01-05 12:00");
        let mut fresh = appointment(2, "2024-05-03 09:00", 60, AppointmentStatus::Active, 2);
        fresh.customer.registered_at = at("2024-05-01 08:00");
        let mut fresh_again = fresh.clone();
        fresh_again.id = 3;

        let share = new_customer_share(&[returning, fresh, fresh_again], &may());
        assert_eq!(share, Some(50.0));
    }

    #[test]
    fn test_lead_time_rounds_average() {
        let mut a = appointment(1, "2024-05-10 09:00", 60, AppointmentStatus::Active, 1);
        a.created_at = at("2024-05-07 10:00"); // 2 whole days
        let mut b = appointment(2, "2024-05-10 09:00", 60, AppointmentStatus::Active, 2);
        b.created_at = at("2024-05-09 08:00"); // 1 day
        assert_eq!(average_lead_time_days(&[a.clone(), b.clone()], &may()), Some(2));
        assert_eq!(average_lead_time_days(&[b], &may()), Some(1));
    }

    #[test]
    fn test_projected_revenue() {
        let p = projected_revenue_30_days(Decimal::new(300, 0), 10);
        assert_eq!(p, Decimal::new(900, 0));
        assert_eq!(projected_revenue_30_days(Decimal::new(100, 0), 0), Decimal::ZERO);
    }

    #[test]
    fn test_single_wednesday_appointment() {
        let list = vec![appointment(1, "2024-05-15 10:00", 60, AppointmentStatus::Active, 1)];
        let counts = day_of_week_counts(&list, &may());
        for (day, count) in counts {
            let expected = if day == DayOfWeek::Wednesday { 1 } else { 0 };
            assert_eq!(count, expected, "{}", day);
        }
        assert_eq!(counts[0].0, DayOfWeek::Monday);
    }

    #[test]
    fn test_service_counts_top_n_and_ties() {
        let mut list = Vec::new();
        let mut next_id = 0;
        let mut push = |service_id: i32, name: &str| {
            next_id += 1;
            let mut a = appointment(next_id, "2024-05-02 09:00", 30, AppointmentStatus::Active, 1);
            a.service.id = service_id;
            a.service.name = name.to_string();
            list.push(a);
        };
        push(10, "Cut");
        push(20, "Color");
        push(20, "Color");
        push(30, "Wash");
        push(10, "Cut");
        push(40, "Nails");

        let (total, rows) = service_counts(&list, &may(), 3);
        assert_eq!(total, 6);
        let names: Vec<_> = rows.iter().map(|r| r.service_name.as_str()).collect();
        // Cut and Color tie at 2; Cut was seen first. Wash beats Nails by order.
        assert_eq!(names, vec!["Cut", "Color", "Wash"]);
        assert_eq!(rows[0].percentage, 33.33);
    }

    #[test]
    fn test_hour_bounds() {
        assert_eq!(hour_bounds(&[]), (DEFAULT_OPENING_HOUR, DEFAULT_CLOSING_HOUR));
        let week = vec![
            hours(DayOfWeek::Monday, Some(("09:00", "17:00")), false),
            hours(DayOfWeek::Saturday, Some(("10:00", "18:30")), false),
            hours(DayOfWeek::Sunday, Some(("06:00", "22:00")), true),
        ];
        assert_eq!(hour_bounds(&week), (9, 19));
    }

    #[test]
    fn test_hourly_counts() {
        let week = vec![hours(DayOfWeek::Monday, Some(("09:00", "12:00")), false)];
        let list = vec![
            appointment(1, "2024-05-13 09:15", 30, AppointmentStatus::Active, 1),
            appointment(2, "2024-05-13 09:45", 30, AppointmentStatus::Active, 1),
            appointment(3, "2024-05-13 11:00", 30, AppointmentStatus::Active, 1),
            appointment(4, "2024-05-13 13:00", 30, AppointmentStatus::Active, 1),
        ];
        assert_eq!(hourly_counts(&list, &may(), &week), vec![(9, 2), (10, 0), (11, 1)]);
    }
}
