//! Service catalog endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        service::{CreateService, Service, UpdateService},
        user::RequestContext,
    },
    AppState,
};

use super::{AppJson, AppPath};

/// List bookable services
#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    responses(
        (status = 200, description = "Services", body = Vec<Service>)
    )
)]
pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<Vec<Service>>> {
    Ok(Json(state.services.catalog.list().await?))
}

/// Get a service
#[utoipa::path(
    get,
    path = "/services/{id}",
    tag = "services",
    params(("id" = i32, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = Service),
        (status = 404, description = "Unknown service", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_service(State(state): State<AppState>, AppPath(id): AppPath<i32>) -> AppResult<Json<Service>> {
    Ok(Json(state.services.catalog.get(id).await?))
}

/// Create a service
#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    security(("bearer_auth" = [])),
    request_body = CreateService,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 400, description = "Invalid service", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_service(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppJson(data): AppJson<CreateService>,
) -> AppResult<(StatusCode, Json<Service>)> {
    let service = state.services.catalog.create(&ctx, data).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// Update a service
#[utoipa::path(
    put,
    path = "/services/{id}",
    tag = "services",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service ID")),
    request_body = UpdateService,
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 404, description = "Unknown service", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_service(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<UpdateService>,
) -> AppResult<Json<Service>> {
    Ok(Json(state.services.catalog.update(&ctx, id, data).await?))
}

/// Delete a service
#[utoipa::path(
    delete,
    path = "/services/{id}",
    tag = "services",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Service deleted"),
        (status = 404, description = "Unknown service", body = crate::error::ErrorResponse),
        (status = 409, description = "Service has appointments", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_service(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
