//! Salon Booking Server
//!
//! REST JSON API for a single-location salon: public appointment booking,
//! working hours and blocked time slots, the service catalog, customers,
//! and business statistics for the administration dashboard.

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    /// Used by the readiness check
    pub pool: Pool<Postgres>,
}
