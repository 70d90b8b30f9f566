//! Repository layer for database operations

pub mod appointments;
pub mod blocked_slots;
pub mod catalog;
pub mod customers;
pub mod users;
pub mod working_hours;

use sqlx::{Pool, Postgres};

use crate::error::AppError;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub appointments: appointments::AppointmentsRepository,
    pub blocked_slots: blocked_slots::BlockedSlotsRepository,
    pub catalog: catalog::CatalogRepository,
    pub customers: customers::CustomersRepository,
    pub users: users::UsersRepository,
    pub working_hours: working_hours::WorkingHoursRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            appointments: appointments::AppointmentsRepository::new(pool.clone()),
            blocked_slots: blocked_slots::BlockedSlotsRepository::new(pool.clone()),
            catalog: catalog::CatalogRepository::new(pool.clone()),
            customers: customers::CustomersRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            working_hours: working_hours::WorkingHoursRepository::new(pool.clone()),
            pool,
        }
    }
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

fn has_sqlstate(error: &sqlx::Error, sqlstate: &str) -> bool {
    error
        .as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == sqlstate)
}

pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    has_sqlstate(error, FOREIGN_KEY_VIOLATION)
}

/// Turn a unique-key violation into a typed conflict; other errors pass through
pub(crate) fn conflict_on_duplicate(error: sqlx::Error, message: impl Into<String>) -> AppError {
    if has_sqlstate(&error, UNIQUE_VIOLATION) {
        AppError::Conflict(message.into())
    } else {
        AppError::Database(error)
    }
}
