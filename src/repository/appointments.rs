//! Appointments repository for database operations

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgConnection, Pool, Postgres};

use crate::{
    config::RevenueMode,
    error::{AppError, AppResult},
    models::appointment::{Appointment, AppointmentRecord, AppointmentRow, NewAppointment},
};

/// Appointment joined with its service and customer, aliased to [`AppointmentRow`]
const SELECT_APPOINTMENTS: &str = r#"
    SELECT a.id, a.start_time, a.notes, a.created_at, a.status, a.booked_price,
           s.id AS service_id, s.name AS service_name, s.price AS service_price,
           s.duration_minutes AS service_duration_minutes,
           c.id AS customer_id, c.first_name AS customer_first_name,
           c.last_name AS customer_last_name, c.email AS customer_email,
           c.phone_number AS customer_phone_number, c.created_at AS customer_created_at
    FROM appointments a
    JOIN services s ON s.id = a.service_id
    JOIN customers c ON c.id = a.customer_id
"#;

/// Per-service totals for reports
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRevenueRow {
    pub service_id: i32,
    pub service_name: String,
    pub appointment_count: i64,
    pub revenue: Decimal,
}

#[derive(Clone)]
pub struct AppointmentsRepository {
    pool: Pool<Postgres>,
}

impl AppointmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get appointment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Appointment> {
        let query = format!("{} WHERE a.id = $1", SELECT_APPOINTMENTS);
        sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Appointment::from)
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    /// Appointments starting within `[start, end]` (both inclusive), any status
    pub async fn list_by_date_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<Vec<Appointment>> {
        let query = format!(
            "{} WHERE a.start_time >= $1 AND a.start_time <= $2 ORDER BY a.start_time, a.id",
            SELECT_APPOINTMENTS
        );
        let rows = sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Appointments starting within `[start, end)`, any status
    pub async fn list_starting_between(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<Vec<Appointment>> {
        let query = format!(
            "{} WHERE a.start_time >= $1 AND a.start_time < $2 ORDER BY a.start_time, a.id",
            SELECT_APPOINTMENTS
        );
        let rows = sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Non-cancelled appointments starting within `[start, end)`.
    /// Runs on the caller's connection so it can take part in a transaction.
    pub async fn list_active_starting_between(
        &self,
        conn: &mut PgConnection,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<Vec<Appointment>> {
        let query = format!(
            "{} WHERE a.status <> 'cancelled' AND a.start_time >= $1 AND a.start_time < $2 \
             ORDER BY a.start_time, a.id",
            SELECT_APPOINTMENTS
        );
        let rows = sqlx::query_as::<_, AppointmentRow>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    /// Load and lock the stored columns of an appointment
    pub async fn get_record_for_update(&self, conn: &mut PgConnection, id: i32) -> AppResult<AppointmentRecord> {
        sqlx::query_as::<_, AppointmentRecord>(
            r#"
            SELECT id, start_time, service_id, customer_id, notes, status
            FROM appointments
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    /// Insert an appointment and return its ID
    pub async fn insert(&self, conn: &mut PgConnection, data: &NewAppointment) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO appointments (start_time, service_id, customer_id, notes, created_at, status, booked_price)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(data.start_time)
        .bind(data.service_id)
        .bind(data.customer_id)
        .bind(&data.notes)
        .bind(data.created_at)
        .bind(data.status)
        .bind(data.booked_price)
        .fetch_one(&mut *conn)
        .await?;
        Ok(id)
    }

    /// Overwrite the mutable columns of an appointment
    pub async fn update(&self, conn: &mut PgConnection, record: &AppointmentRecord) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE appointments
            SET start_time = $2, service_id = $3, customer_id = $4, notes = $5, status = $6
            WHERE id = $1
            "#,
        )
        .bind(record.id)
        .bind(record.start_time)
        .bind(record.service_id)
        .bind(record.customer_id)
        .bind(&record.notes)
        .bind(record.status)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Appointment {} not found", record.id)));
        }
        Ok(())
    }

    /// Delete an appointment
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Appointment {} not found", id)));
        }
        Ok(())
    }

    /// Per-service count and revenue of non-cancelled appointments in `[start, end)`
    pub async fn service_breakdown(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        revenue_mode: RevenueMode,
    ) -> AppResult<Vec<ServiceRevenueRow>> {
        let rows = sqlx::query_as::<_, ServiceRevenueRow>(
            r#"
            SELECT s.id AS service_id,
                   s.name AS service_name,
                   COUNT(*) AS appointment_count,
                   SUM(CASE WHEN $3 THEN COALESCE(a.booked_price, s.price) ELSE s.price END) AS revenue
            FROM appointments a
            JOIN services s ON s.id = a.service_id
            WHERE a.status <> 'cancelled'
              AND a.start_time >= $1
              AND a.start_time < $2
            GROUP BY s.id, s.name
            ORDER BY appointment_count DESC, s.id
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(revenue_mode == RevenueMode::BookedPrice)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
