//! Appointment endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::{
        appointment::{Appointment, CreateAppointment, UpdateAppointment},
        user::RequestContext,
    },
    AppState,
};

use super::{parse_datetime, AppJson, AppPath, AppQuery};

/// Date range query (ISO-8601 date-times, both inclusive)
#[derive(Debug, Deserialize, IntoParams)]
pub struct DateRangeQuery {
    /// e.g. 2024-05-01T00:00:00
    pub start: Option<String>,
    /// e.g. 2024-05-31T23:59:59
    pub end: Option<String>,
}

/// List appointments starting within a date range
#[utoipa::path(
    get,
    path = "/appointments/by-date-range",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Appointments in range", body = Vec<Appointment>),
        (status = 400, description = "Unparsable date-time", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_by_date_range(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppQuery(query): AppQuery<DateRangeQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let start = parse_datetime(query.start.as_deref().unwrap_or_default(), "start")?;
    let end = parse_datetime(query.end.as_deref().unwrap_or_default(), "end")?;
    let appointments = state
        .services
        .appointments
        .list_by_date_range(&ctx, start, end)
        .await?;
    Ok(Json(appointments))
}

/// Get an appointment
#[utoipa::path(
    get,
    path = "/appointments/{id}",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment", body = Appointment),
        (status = 404, description = "Unknown appointment", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.services.appointments.get(&ctx, id).await?;
    Ok(Json(appointment))
}

/// Book an appointment
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "appointments",
    request_body = CreateAppointment,
    responses(
        (status = 201, description = "Appointment booked", body = Appointment),
        (status = 400, description = "Missing service id or customer email", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown service", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot already taken (strict conflict policy)", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppJson(data): AppJson<CreateAppointment>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let appointment = state.services.appointments.create(&ctx, data).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Update an appointment
#[utoipa::path(
    put,
    path = "/appointments/{id}",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Appointment ID")),
    request_body = UpdateAppointment,
    responses(
        (status = 200, description = "Appointment updated", body = Appointment),
        (status = 404, description = "Unknown appointment", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<UpdateAppointment>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.services.appointments.update(&ctx, id, data).await?;
    Ok(Json(appointment))
}

/// Delete an appointment
#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    tag = "appointments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Appointment ID")),
    responses(
        (status = 204, description = "Appointment deleted"),
        (status = 404, description = "Unknown appointment", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.appointments.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
