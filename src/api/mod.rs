//! API handlers for the salon booking REST endpoints

pub mod appointments;
pub mod auth;
pub mod availability;
pub mod catalog;
pub mod customers;
pub mod health;
pub mod openapi;
pub mod reports;
pub mod schedules;
pub mod stats;

use std::str::FromStr;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    error::AppError,
    models::user::{RequestContext, UserClaims},
    AppState,
};

/// Caller identity from an optional bearer token.
///
/// No Authorization header yields an anonymous context; a malformed or
/// expired token is rejected with 401.
#[async_trait]
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(auth_header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(RequestContext::anonymous());
        };
        let auth_header = auth_header
            .to_str()
            .map_err(|_| AppError::Authentication("Invalid authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(claims.into())
    }
}

/// JSON body whose rejections render as [`AppError`]
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters whose rejections render as [`AppError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query string whose rejections render as [`AppError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Parse an ISO-8601 local date-time (seconds optional)
pub fn parse_datetime(value: &str, field: &str) -> Result<NaiveDateTime, AppError> {
    NaiveDateTime::from_str(value)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|_| {
            AppError::Validation(format!(
                "Invalid {} '{}' (expected ISO-8601 date-time, e.g. 2024-05-15T10:00:00)",
                field, value
            ))
        })
}

/// Parse a YYYY-MM-DD date
pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} '{}' (expected YYYY-MM-DD)", field, value)))
}

/// Parse an optional YYYY-MM-DD query parameter
pub fn parse_optional_date(value: Option<&str>, field: &str) -> Result<Option<NaiveDate>, AppError> {
    value.map(|v| parse_date(v, field)).transpose()
}
