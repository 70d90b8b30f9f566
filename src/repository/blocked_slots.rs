//! Blocked time slots repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        blocked_slot::{BlockedTimeSlot, BlockedTimeSlotValues},
        enums::DayOfWeek,
    },
};

const BLOCK_COLUMNS: &str =
    "id, description, start_time, end_time, specific_date, recurring_day_of_week, repeating";

#[derive(Clone)]
pub struct BlockedSlotsRepository {
    pool: Pool<Postgres>,
}

impl BlockedSlotsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all blocks: recurring ones first, then one-off blocks by date
    pub async fn list(&self) -> AppResult<Vec<BlockedTimeSlot>> {
        let query = format!(
            "SELECT {} FROM blocked_time_slots \
             ORDER BY repeating DESC, recurring_day_of_week, specific_date, start_time, id",
            BLOCK_COLUMNS
        );
        let rows = sqlx::query_as::<_, BlockedTimeSlot>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// One-off blocks within `[start, end]` plus every recurring block
    pub async fn list_applicable_between(&self, start: NaiveDate, end: NaiveDate) -> AppResult<Vec<BlockedTimeSlot>> {
        let query = format!(
            "SELECT {} FROM blocked_time_slots \
             WHERE repeating OR (specific_date >= $1 AND specific_date <= $2) \
             ORDER BY start_time, id",
            BLOCK_COLUMNS
        );
        let rows = sqlx::query_as::<_, BlockedTimeSlot>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Blocks that apply on a given date
    pub async fn list_for_date(&self, date: NaiveDate) -> AppResult<Vec<BlockedTimeSlot>> {
        let query = format!(
            "SELECT {} FROM blocked_time_slots \
             WHERE (NOT repeating AND specific_date = $1) \
                OR (repeating AND recurring_day_of_week = $2) \
             ORDER BY start_time, id",
            BLOCK_COLUMNS
        );
        let rows = sqlx::query_as::<_, BlockedTimeSlot>(&query)
            .bind(date)
            .bind(DayOfWeek::of(date))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get a block by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BlockedTimeSlot> {
        let query = format!("SELECT {} FROM blocked_time_slots WHERE id = $1", BLOCK_COLUMNS);
        sqlx::query_as::<_, BlockedTimeSlot>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blocked time slot {} not found", id)))
    }

    /// Create a block
    pub async fn create(&self, values: &BlockedTimeSlotValues) -> AppResult<BlockedTimeSlot> {
        let query = format!(
            r#"
            INSERT INTO blocked_time_slots
                (description, start_time, end_time, specific_date, recurring_day_of_week, repeating)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            BLOCK_COLUMNS
        );
        let row = sqlx::query_as::<_, BlockedTimeSlot>(&query)
            .bind(&values.description)
            .bind(values.start_time)
            .bind(values.end_time)
            .bind(values.specific_date)
            .bind(values.recurring_day_of_week)
            .bind(values.repeating)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Replace a block
    pub async fn update(&self, id: i32, values: &BlockedTimeSlotValues) -> AppResult<BlockedTimeSlot> {
        let query = format!(
            r#"
            UPDATE blocked_time_slots
            SET description = $2, start_time = $3, end_time = $4,
                specific_date = $5, recurring_day_of_week = $6, repeating = $7
            WHERE id = $1
            RETURNING {}
            "#,
            BLOCK_COLUMNS
        );
        sqlx::query_as::<_, BlockedTimeSlot>(&query)
            .bind(id)
            .bind(&values.description)
            .bind(values.start_time)
            .bind(values.end_time)
            .bind(values.specific_date)
            .bind(values.recurring_day_of_week)
            .bind(values.repeating)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Blocked time slot {} not found", id)))
    }

    /// Delete a block
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM blocked_time_slots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Blocked time slot {} not found", id)));
        }
        Ok(())
    }
}
