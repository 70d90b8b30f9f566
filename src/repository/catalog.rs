//! Service catalog repository

use sqlx::{PgConnection, Pool, Postgres};

use super::is_foreign_key_violation;
use crate::{
    error::{AppError, AppResult},
    models::service::{CreateService, Service, UpdateService},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: Pool<Postgres>,
}

impl CatalogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all services, ordered by name
    pub async fn list(&self) -> AppResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, Service>(
            "SELECT id, name, description, price, duration_minutes FROM services ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get a service by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Service> {
        let mut conn = self.pool.acquire().await?;
        self.get_by_id_on(&mut conn, id).await
    }

    /// Get a service by ID on the caller's connection
    pub async fn get_by_id_on(&self, conn: &mut PgConnection, id: i32) -> AppResult<Service> {
        sqlx::query_as::<_, Service>(
            "SELECT id, name, description, price, duration_minutes FROM services WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }

    /// Create a service
    pub async fn create(&self, data: &CreateService) -> AppResult<Service> {
        let row = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (name, description, price, duration_minutes)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, duration_minutes
            "#,
        )
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.duration_minutes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a service; absent fields keep their value
    pub async fn update(&self, id: i32, data: &UpdateService) -> AppResult<Service> {
        sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                duration_minutes = COALESCE($5, duration_minutes)
            WHERE id = $1
            RETURNING id, name, description, price, duration_minutes
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.duration_minutes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }

    /// Delete a service (fails while appointments reference it)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(format!("Service {} is referenced by appointments", id))
                } else {
                    AppError::Database(e)
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Service {} not found", id)));
        }
        Ok(())
    }
}
