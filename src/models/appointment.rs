//! Appointment model, status lifecycle and request types

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::{
    customer::{CustomerInput, CustomerRef},
    service::ServiceRef,
};
use crate::config::RevenueMode;

// ---------------------------------------------------------------------------
// AppointmentStatus
// ---------------------------------------------------------------------------

/// Appointment status. `Active` is the status of appointments booked without
/// an explicit workflow state.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "appointment_status", rename_all = "lowercase")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Active,
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    /// Everything except `Cancelled` counts in aggregates
    pub fn is_active(&self) -> bool {
        *self != AppointmentStatus::Cancelled
    }

    /// PENDING -> CONFIRMED -> COMPLETED, any live state -> CANCELLED.
    /// `Active` may enter the workflow at any point.
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;

        if *self == next {
            return true;
        }
        match (*self, next) {
            (Cancelled, _) => false,
            (_, Cancelled) => true,
            (Active, _) => true,
            (Pending, Confirmed) => true,
            (Confirmed, Completed) => true,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Appointment
// ---------------------------------------------------------------------------

/// Internal row structure: appointment joined with its service and customer
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentRow {
    pub id: i32,
    pub start_time: NaiveDateTime,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub status: AppointmentStatus,
    pub booked_price: Option<Decimal>,
    pub service_id: i32,
    pub service_name: String,
    pub service_price: Decimal,
    pub service_duration_minutes: i32,
    pub customer_id: i32,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_email: String,
    pub customer_phone_number: Option<String>,
    pub customer_created_at: NaiveDateTime,
}

/// Service as seen from an appointment (live values)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentService {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub duration_minutes: i32,
}

/// Customer as seen from an appointment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentCustomer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub registered_at: NaiveDateTime,
}

/// Appointment with its resolved service and customer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i32,
    pub start_time: NaiveDateTime,
    /// End of the occupied interval (exclusive)
    pub end_time: NaiveDateTime,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub status: AppointmentStatus,
    /// Service price captured when the appointment was booked
    pub booked_price: Option<Decimal>,
    pub service: AppointmentService,
    pub customer: AppointmentCustomer,
}

impl From<AppointmentRow> for Appointment {
    fn from(row: AppointmentRow) -> Self {
        Self {
            id: row.id,
            start_time: row.start_time,
            end_time: row
                .start_time
                .checked_add_signed(Duration::minutes(row.service_duration_minutes as i64))
                .unwrap_or(NaiveDateTime::MAX),
            notes: row.notes,
            created_at: row.created_at,
            status: row.status,
            booked_price: row.booked_price,
            service: AppointmentService {
                id: row.service_id,
                name: row.service_name,
                price: row.service_price,
                duration_minutes: row.service_duration_minutes,
            },
            customer: AppointmentCustomer {
                id: row.customer_id,
                first_name: row.customer_first_name,
                last_name: row.customer_last_name,
                email: row.customer_email,
                phone_number: row.customer_phone_number,
                registered_at: row.customer_created_at,
            },
        }
    }
}

impl Appointment {
    pub fn duration_minutes(&self) -> i64 {
        self.service.duration_minutes as i64
    }

    /// Half-open overlap of the occupied interval with `[start, end)`
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_time < end && self.end_time > start
    }

    /// Price counted towards revenue
    pub fn revenue(&self, mode: RevenueMode) -> Decimal {
        match mode {
            RevenueMode::LivePrice => self.service.price,
            RevenueMode::BookedPrice => self.booked_price.unwrap_or(self.service.price),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Create appointment request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointment {
    pub service: Option<ServiceRef>,
    pub customer: Option<CustomerInput>,
    pub start_time: NaiveDateTime,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

/// Update appointment request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointment {
    pub service: Option<ServiceRef>,
    pub customer: Option<CustomerRef>,
    pub start_time: Option<NaiveDateTime>,
    /// Replaces the current notes; null clears them
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

/// Values written by an insert
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub start_time: NaiveDateTime,
    pub service_id: i32,
    pub customer_id: i32,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub status: AppointmentStatus,
    pub booked_price: Decimal,
}

/// Stored columns of an appointment, as loaded for an update
#[derive(Debug, Clone, FromRow)]
pub struct AppointmentRecord {
    pub id: i32,
    pub start_time: NaiveDateTime,
    pub service_id: i32,
    pub customer_id: i32,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}
