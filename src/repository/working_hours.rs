//! Working hours repository

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::working_hours::{WorkingHours, WorkingHoursValues},
};

#[derive(Clone)]
pub struct WorkingHoursRepository {
    pool: Pool<Postgres>,
}

impl WorkingHoursRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All configured weekdays, Monday first
    pub async fn list(&self) -> AppResult<Vec<WorkingHours>> {
        let rows = sqlx::query_as::<_, WorkingHours>(
            "SELECT id, day_of_week, start_time, end_time, is_closed FROM working_hours ORDER BY day_of_week",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Insert or replace the single row of a weekday
    pub async fn upsert(&self, values: &WorkingHoursValues) -> AppResult<WorkingHours> {
        let row = sqlx::query_as::<_, WorkingHours>(
            r#"
            INSERT INTO working_hours (day_of_week, start_time, end_time, is_closed)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (day_of_week) DO UPDATE
            SET start_time = EXCLUDED.start_time,
                end_time = EXCLUDED.end_time,
                is_closed = EXCLUDED.is_closed
            RETURNING id, day_of_week, start_time, end_time, is_closed
            "#,
        )
        .bind(values.day_of_week)
        .bind(values.start_time)
        .bind(values.end_time)
        .bind(values.is_closed)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
