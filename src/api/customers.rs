//! Customer management endpoints (admin)

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        customer::{CreateCustomer, Customer, UpdateCustomer},
        user::RequestContext,
    },
    AppState,
};

use super::{AppJson, AppPath};

/// List customers
#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Customers", body = Vec<Customer>)
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> AppResult<Json<Vec<Customer>>> {
    Ok(Json(state.services.customers.list(&ctx).await?))
}

/// Get a customer
#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer", body = Customer),
        (status = 404, description = "Unknown customer", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<Customer>> {
    Ok(Json(state.services.customers.get(&ctx, id).await?))
}

/// Register a customer
#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    security(("bearer_auth" = [])),
    request_body = CreateCustomer,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppJson(data): AppJson<CreateCustomer>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    let customer = state.services.customers.create(&ctx, data).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// Update a customer
#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    request_body = UpdateCustomer,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 404, description = "Unknown customer", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppPath(id): AppPath<i32>,
    AppJson(data): AppJson<UpdateCustomer>,
) -> AppResult<Json<Customer>> {
    Ok(Json(state.services.customers.update(&ctx, id, data).await?))
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Unknown customer", body = crate::error::ErrorResponse),
        (status = 409, description = "Customer has appointments", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppPath(id): AppPath<i32>,
) -> AppResult<StatusCode> {
    state.services.customers.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
