//! Business logic services

pub mod appointments;
pub mod auth;
pub mod availability;
pub mod capacity;
pub mod catalog;
pub mod conflicts;
pub mod customers;
pub mod email;
pub mod metrics;
pub mod reports;
pub mod schedules;
pub mod stats;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub appointments: appointments::AppointmentsService,
    pub auth: auth::AuthService,
    pub availability: availability::AvailabilityService,
    pub capacity: capacity::CapacityService,
    pub catalog: catalog::CatalogService,
    pub customers: customers::CustomersService,
    pub reports: reports::ReportsService,
    pub schedules: schedules::SchedulesService,
    pub stats: stats::StatsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            appointments: appointments::AppointmentsService::new(
                repository.clone(),
                config.booking.clone(),
                email::EmailService::new(config.email.clone()),
            ),
            auth: auth::AuthService::new(repository.clone(), config.auth.clone()),
            availability: availability::AvailabilityService::new(repository.clone()),
            capacity: capacity::CapacityService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            customers: customers::CustomersService::new(repository.clone()),
            reports: reports::ReportsService::new(repository.clone(), config.statistics.revenue_mode),
            schedules: schedules::SchedulesService::new(repository.clone()),
            stats: stats::StatsService::new(repository, config.statistics.clone()),
        }
    }
}

/// Builders shared by the unit tests of the pure scheduling and metrics code
#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;

    use crate::models::{
        appointment::{Appointment, AppointmentCustomer, AppointmentService, AppointmentStatus},
        blocked_slot::BlockedTimeSlot,
        enums::DayOfWeek,
        time_format::parse_hhmm,
        working_hours::WorkingHours,
    };

    /// "YYYY-MM-DD HH:MM"
    pub fn at(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").unwrap()
    }

    pub fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    pub fn hours(day: DayOfWeek, span: Option<(&str, &str)>, is_closed: bool) -> WorkingHours {
        WorkingHours {
            id: day as i32 + 1,
            day_of_week: day,
            start_time: span.map(|(s, _)| parse_hhmm(s, "start").unwrap()),
            end_time: span.map(|(_, e)| parse_hhmm(e, "end").unwrap()),
            is_closed,
        }
    }

    /// Recurring block on `day`, or a one-off block without a date when not repeating
    pub fn block(day: DayOfWeek, start: &str, end: &str, repeating: bool) -> BlockedTimeSlot {
        BlockedTimeSlot {
            id: 1,
            description: None,
            start_time: parse_hhmm(start, "start").unwrap(),
            end_time: parse_hhmm(end, "end").unwrap(),
            specific_date: None,
            recurring_day_of_week: repeating.then_some(day),
            repeating,
        }
    }

    /// Appointment for service 1 ("Haircut", 25.00) booked a day in advance
    pub fn appointment(
        id: i32,
        start: &str,
        duration_minutes: i32,
        status: AppointmentStatus,
        customer_id: i32,
    ) -> Appointment {
        let start_time = at(start);
        let price = Decimal::new(2500, 2);
        Appointment {
            id,
            start_time,
            end_time: start_time + Duration::minutes(duration_minutes as i64),
            notes: None,
            created_at: start_time - Duration::days(1),
            status,
            booked_price: Some(price),
            service: AppointmentService {
                id: 1,
                name: "Haircut".to_string(),
                price,
                duration_minutes,
            },
            customer: AppointmentCustomer {
                id: customer_id,
                first_name: "Ana".to_string(),
                last_name: "Lopez".to_string(),
                email: format!("customer{}@example.com", customer_id),
                phone_number: None,
                registered_at: at("2024-01-01 00:00"),
            },
        }
    }
}
