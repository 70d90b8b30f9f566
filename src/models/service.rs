//! Salon service (treatment) model

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Longest bookable service; bounds how far back conflict detection looks
pub const MAX_SERVICE_MINUTES: i32 = 24 * 60;

/// A bookable service with its current price and duration
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Price in currency units
    pub price: Decimal,
    pub duration_minutes: i32,
}

impl Service {
    /// End of the slot a booking starting at `start` occupies
    pub fn occupied_until(&self, start: NaiveDateTime) -> AppResult<NaiveDateTime> {
        start
            .checked_add_signed(Duration::minutes(self.duration_minutes as i64))
            .ok_or_else(|| AppError::Validation(format!("Start time {} is out of the supported range", start)))
    }
}

/// Create service request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateService {
    #[validate(length(min = 1, max = 120, message = "Name must be 1 to 120 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    #[validate(range(min = 1, max = MAX_SERVICE_MINUTES, message = "Duration must be between 1 minute and 24 hours"))]
    pub duration_minutes: i32,
}

/// Update service request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateService {
    #[validate(length(min = 1, max = 120, message = "Name must be 1 to 120 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    #[validate(range(min = 1, max = MAX_SERVICE_MINUTES, message = "Duration must be between 1 minute and 24 hours"))]
    pub duration_minutes: Option<i32>,
}

pub(crate) fn ensure_price(price: Option<Decimal>) -> AppResult<()> {
    match price {
        Some(p) if p.is_sign_negative() => Err(AppError::Validation("Price must not be negative".to_string())),
        _ => Ok(()),
    }
}

/// Reference to a service inside a booking request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ServiceRef {
    pub id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_bounds() {
        let ok = CreateService {
            name: "Haircut".into(),
            description: None,
            price: Decimal::new(3500, 2),
            duration_minutes: 45,
        };
        assert!(ok.validate().is_ok());

        let longest = CreateService { duration_minutes: MAX_SERVICE_MINUTES, ..ok };
        assert!(longest.validate().is_ok());

        let too_long = CreateService { duration_minutes: MAX_SERVICE_MINUTES + 1, ..longest };
        assert!(too_long.validate().is_err());

        let zero = CreateService { duration_minutes: 0, ..too_long };
        assert!(zero.validate().is_err());

        let update = UpdateService {
            name: None,
            description: None,
            price: None,
            duration_minutes: Some(MAX_SERVICE_MINUTES + 1),
        };
        assert!(update.validate().is_err());
    }

    fn haircut() -> Service {
        Service {
            id: 1,
            name: "Haircut".into(),
            description: None,
            price: Decimal::new(2500, 2),
            duration_minutes: 45,
        }
    }

    #[test]
    fn test_occupied_until() {
        let start = NaiveDateTime::parse_from_str("2024-05-15 10:00", "%Y-%m-%d %H:%M").unwrap();
        let end = NaiveDateTime::parse_from_str("2024-05-15 10:45", "%Y-%m-%d %H:%M").unwrap();
        assert_eq!(haircut().occupied_until(start).unwrap(), end);
    }

    #[test]
    fn test_occupied_until_past_calendar_end() {
        let start = NaiveDateTime::MAX - Duration::minutes(10);
        assert!(matches!(haircut().occupied_until(start), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(ensure_price(Some(Decimal::new(-1, 0))).is_err());
        assert!(ensure_price(Some(Decimal::ZERO)).is_ok());
        assert!(ensure_price(None).is_ok());
    }
}
