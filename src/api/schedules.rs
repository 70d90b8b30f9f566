//! Schedule endpoints (working hours, blocked time slots)

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        blocked_slot::{BlockedTimeSlot, BlockedTimeSlotRequest},
        user::RequestContext,
        working_hours::{UpsertWorkingHours, WorkingHours},
    },
    AppState,
};

use super::{parse_date, AppJson, AppPath};

// ---- Working hours ----

/// Weekly working hours
#[utoipa::path(
    get,
    path = "/workinghours",
    tag = "schedules",
    responses(
        (status = 200, description = "Working hours, Monday first", body = Vec<WorkingHours>)
    )
)]
pub async fn list_working_hours(State(state): State<AppState>) -> AppResult<Json<Vec<WorkingHours>>> {
    Ok(Json(state.services.schedules.list_working_hours().await?))
}

/// Set the working hours of a weekday
#[utoipa::path(
    post,
    path = "/workinghours",
    tag = "schedules",
    security(("bearer_auth" = [])),
    request_body = UpsertWorkingHours,
    responses(
        (status = 200, description = "Working hours saved", body = WorkingHours),
        (status = 400, description = "Invalid times", body = crate::error::ErrorResponse)
    )
)]
pub async fn upsert_working_hours(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppJson(data): AppJson<UpsertWorkingHours>,
) -> AppResult<Json<WorkingHours>> {
    Ok(Json(state.services.schedules.upsert_working_hours(&ctx, data).await?))
}

// ---- Blocked time slots ----

/// List all blocked time slots
#[utoipa::path(
    get,
    path = "/blockedtimeslots",
    tag = "schedules",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Blocked time slots", body = Vec<BlockedTimeSlot>)
    )
)]
pub async fn list_blocked_slots(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> AppResult<Json<Vec<BlockedTimeSlot>>> {
    Ok(Json(state.services.schedules.list_blocked_slots(&ctx).await?))
}

/// Blocked time slots applying on a date
#[utoipa::path(
    get,
    path = "/blockedtimeslots/date/{date}",
    tag = "schedules",
    params(("date" = String, Path, description = "Date (YYYY-MM-DD)")),
    responses(
        (status = 200, description = "Applicable blocks", body = Vec<BlockedTimeSlot>),
        (status = 400, description = "Invalid date", body = crate::error::ErrorResponse)
    )
)]
pub async fn blocked_slots_for_date(
    State(state): State<AppState>,
    AppPath(date): AppPath<String>,
) -> AppResult<Json<Vec<BlockedTimeSlot>>> {
    let date = parse_date(&date, "date")?;
    Ok(Json(state.services.schedules.blocked_slots_for_date(date).await?))
}

/// Create a blocked time slot
#[utoipa::path(
    post,
    path = "/blockedtimeslots",
    tag = "schedules",
    security(("bearer_auth" = [])),
    request_body = BlockedTimeSlotRequest,
    responses(
        (status = 201, description = "Block created", body = BlockedTimeSlot),
        (status = 400, description = "Invalid time ordering or missing date/day", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_blocked_slot(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppJson(data): AppJson<BlockedTimeSlotRequest>,
) -> AppResult<(StatusCode, Json<BlockedTimeSlot>)> {
    let slot = state.services.schedules.create_blocked_slot(&ctx, data).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// Replace a blocked time slot
#[utoipa::path(
    put,
    path = "/blockedtimeslots/{id}",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Block ID")),
    request_body = BlockedTimeSlotRequest,
    responses(
        (status = 200, description = "Block updated", body = BlockedTimeSlot),
        (status = 404, description = "Unknown block", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_blocked_slot(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<BlockedTimeSlotRequest>,
) -> AppResult<Json<BlockedTimeSlot>> {
    Ok(Json(state.services.schedules.update_blocked_slot(&ctx, id, data).await?))
}

/// Delete a blocked time slot
#[utoipa::path(
    delete,
    path = "/blockedtimeslots/{id}",
    tag = "schedules",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Block ID")),
    responses(
        (status = 204, description = "Block deleted"),
        (status = 404, description = "Unknown block", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_blocked_slot(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.schedules.delete_blocked_slot(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
