//! Customers repository for database operations

use chrono::NaiveDateTime;
use sqlx::{PgConnection, Pool, Postgres};

use super::{conflict_on_duplicate, is_foreign_key_violation};
use crate::{
    error::{AppError, AppResult},
    models::customer::{CreateCustomer, Customer, CustomerContact, UpdateCustomer},
};

const CUSTOMER_COLUMNS: &str = "id, first_name, last_name, email, phone_number, notes, created_at";

#[derive(Clone)]
pub struct CustomersRepository {
    pool: Pool<Postgres>,
}

impl CustomersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List customers, ordered by name
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let query = format!(
            "SELECT {} FROM customers ORDER BY last_name, first_name, id",
            CUSTOMER_COLUMNS
        );
        let rows = sqlx::query_as::<_, Customer>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get customer by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Customer> {
        let mut conn = self.pool.acquire().await?;
        self.get_by_id_on(&mut conn, id).await
    }

    /// Get customer by ID on the caller's connection
    pub async fn get_by_id_on(&self, conn: &mut PgConnection, id: i32) -> AppResult<Customer> {
        let query = format!("SELECT {} FROM customers WHERE id = $1", CUSTOMER_COLUMNS);
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    /// Case-insensitive lookup by e-mail
    pub async fn find_by_email(&self, conn: &mut PgConnection, email: &str) -> AppResult<Option<Customer>> {
        let query = format!(
            "SELECT {} FROM customers WHERE lower(email) = lower($1)",
            CUSTOMER_COLUMNS
        );
        let row = sqlx::query_as::<_, Customer>(&query)
            .bind(email)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    /// Insert a customer created by a booking (no admin notes)
    pub async fn insert_contact(
        &self,
        conn: &mut PgConnection,
        contact: &CustomerContact,
        created_at: NaiveDateTime,
    ) -> AppResult<Customer> {
        let query = format!(
            r#"
            INSERT INTO customers (first_name, last_name, email, phone_number, notes, created_at)
            VALUES ($1, $2, $3, $4, NULL, $5)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.email)
            .bind(&contact.phone_number)
            .bind(created_at)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| conflict_on_duplicate(e, format!("Customer {} already exists", contact.email)))
    }

    /// Refresh name and phone of an existing customer; notes are not touched
    pub async fn update_contact(
        &self,
        conn: &mut PgConnection,
        id: i32,
        contact: &CustomerContact,
    ) -> AppResult<Customer> {
        let query = format!(
            r#"
            UPDATE customers
            SET first_name = $2, last_name = $3, phone_number = $4
            WHERE id = $1
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&contact.first_name)
            .bind(&contact.last_name)
            .bind(&contact.phone_number)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    /// Create a customer (customer management)
    pub async fn create(&self, data: &CreateCustomer, created_at: NaiveDateTime) -> AppResult<Customer> {
        let query = format!(
            r#"
            INSERT INTO customers (first_name, last_name, email, phone_number, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(&data.phone_number)
            .bind(&data.notes)
            .bind(created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| conflict_on_duplicate(e, format!("Email {} is already registered", data.email)))
    }

    /// Update a customer; absent fields keep their value
    pub async fn update(&self, id: i32, data: &UpdateCustomer) -> AppResult<Customer> {
        let query = format!(
            r#"
            UPDATE customers
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone_number = COALESCE($5, phone_number),
                notes = COALESCE($6, notes)
            WHERE id = $1
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );
        sqlx::query_as::<_, Customer>(&query)
            .bind(id)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(&data.email)
            .bind(&data.phone_number)
            .bind(&data.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| conflict_on_duplicate(e, "Email is already registered"))?
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    /// Delete a customer (fails while appointments reference it)
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::Conflict(format!("Customer {} has appointments", id))
                } else {
                    AppError::Database(e)
                }
            })?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Customer {} not found", id)));
        }
        Ok(())
    }
}
