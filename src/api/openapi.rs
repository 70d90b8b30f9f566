//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    appointments, auth, availability, catalog, customers, health, reports, schedules, stats,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Salon Booking API",
        version = "1.0.0",
        description = "Appointment booking, schedules and business statistics for a salon"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Appointments
        appointments::list_by_date_range,
        appointments::get_appointment,
        appointments::create_appointment,
        appointments::update_appointment,
        appointments::delete_appointment,
        // Availability
        availability::check_availability,
        // Services
        catalog::list_services,
        catalog::get_service,
        catalog::create_service,
        catalog::update_service,
        catalog::delete_service,
        // Customers
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::update_customer,
        customers::delete_customer,
        // Schedules
        schedules::list_working_hours,
        schedules::upsert_working_hours,
        schedules::list_blocked_slots,
        schedules::blocked_slots_for_date,
        schedules::create_blocked_slot,
        schedules::update_blocked_slot,
        schedules::delete_blocked_slot,
        // Statistics
        stats::detailed_counts,
        stats::by_day_of_week,
        stats::by_service,
        stats::by_hour,
        stats::utilization,
        stats::today_upcoming,
        // Reports
        reports::get_report,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            crate::models::user::Role,
            // Appointments
            crate::models::appointment::Appointment,
            crate::models::appointment::AppointmentService,
            crate::models::appointment::AppointmentCustomer,
            crate::models::appointment::AppointmentStatus,
            crate::models::appointment::CreateAppointment,
            crate::models::appointment::UpdateAppointment,
            crate::models::customer::CustomerInput,
            crate::models::customer::CustomerRef,
            crate::models::service::ServiceRef,
            crate::services::availability::AvailabilityCheck,
            // Services
            crate::models::service::Service,
            crate::models::service::CreateService,
            crate::models::service::UpdateService,
            // Customers
            crate::models::customer::Customer,
            crate::models::customer::CreateCustomer,
            crate::models::customer::UpdateCustomer,
            // Schedules
            crate::models::enums::DayOfWeek,
            crate::models::working_hours::WorkingHours,
            crate::models::working_hours::UpsertWorkingHours,
            crate::models::blocked_slot::BlockedTimeSlot,
            crate::models::blocked_slot::BlockedTimeSlotRequest,
            // Statistics
            stats::CountMetric,
            stats::RevenueMetric,
            stats::RateMetric,
            stats::BucketTotals,
            stats::DetailedStatsResponse,
            stats::DayOfWeekCount,
            stats::DayOfWeekStatsResponse,
            stats::ServiceShare,
            stats::ServiceStatsResponse,
            stats::HourCount,
            stats::HourlyStatsResponse,
            stats::DayUtilization,
            stats::UtilizationResponse,
            // Reports
            reports::ReportResponse,
            reports::ServiceBreakdown,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Staff authentication"),
        (name = "appointments", description = "Appointment booking and management"),
        (name = "availability", description = "Booking availability checks"),
        (name = "services", description = "Service catalog"),
        (name = "customers", description = "Customer management"),
        (name = "schedules", description = "Working hours and blocked time slots"),
        (name = "statistics", description = "Business statistics"),
        (name = "reports", description = "Revenue reports")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
