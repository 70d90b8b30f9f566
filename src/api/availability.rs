//! Availability endpoint

use axum::{
    extract::State,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::{AppError, AppResult},
    services::availability::AvailabilityCheck,
    AppState,
};

use super::{parse_datetime, AppQuery};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    /// Proposed start (ISO-8601 date-time)
    pub start: Option<String>,
    pub service_id: Option<i32>,
}

/// Check whether a service can be booked at a given time
#[utoipa::path(
    get,
    path = "/availability/check",
    tag = "availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Availability verdict", body = AvailabilityCheck),
        (status = 400, description = "Invalid parameters", body = crate::error::ErrorResponse),
        (status = 404, description = "Unknown service", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_availability(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityCheck>> {
    let start = parse_datetime(query.start.as_deref().unwrap_or_default(), "start")?;
    let service_id = query
        .service_id
        .ok_or_else(|| AppError::Validation("serviceId is required".to_string()))?;
    let check = state.services.availability.check(start, service_id).await?;
    Ok(Json(check))
}
