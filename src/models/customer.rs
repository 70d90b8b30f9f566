//! Customer model and booking-time customer resolution

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Customer as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    /// Admin-only free text
    pub notes: Option<String>,
    /// Registration time
    pub created_at: NaiveDateTime,
}

/// Create customer request (customer management)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
}

/// Update customer request (customer management)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub notes: Option<String>,
}

/// Customer details submitted with a booking
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// Contact fields written when a booking creates or refreshes a customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl CustomerInput {
    /// Contact for a customer that does not exist yet
    pub fn new_contact(&self, email: &str) -> CustomerContact {
        CustomerContact {
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
            email: email.to_string(),
            phone_number: self.phone_number.clone(),
        }
    }

    /// Merge the submitted name and phone over an existing customer.
    /// Email and admin notes are left as they are.
    pub fn merge_into(&self, existing: &Customer) -> CustomerContact {
        CustomerContact {
            first_name: self.first_name.clone().unwrap_or_else(|| existing.first_name.clone()),
            last_name: self.last_name.clone().unwrap_or_else(|| existing.last_name.clone()),
            email: existing.email.clone(),
            phone_number: self.phone_number.clone().or_else(|| existing.phone_number.clone()),
        }
    }
}

/// Customer reference used when editing an appointment
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CustomerRef {
    pub id: i32,
}
