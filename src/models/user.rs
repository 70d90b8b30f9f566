//! Staff accounts, JWT claims and the per-request caller context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

/// Staff account as stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub roles: Vec<Role>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Identity of the caller, extracted once per request and handed to every
/// service call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Option<i32>,
    pub roles: Vec<Role>,
}

impl RequestContext {
    /// Unauthenticated caller (public booking pages)
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    pub fn is_staff(&self) -> bool {
        self.is_admin() || self.roles.contains(&Role::Staff)
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if !self.is_authenticated() {
            return Err(AppError::Authentication("Authentication required".to_string()));
        }
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    /// Require a staff or admin account
    pub fn require_staff(&self) -> Result<(), AppError> {
        if !self.is_authenticated() {
            return Err(AppError::Authentication("Authentication required".to_string()));
        }
        if self.is_staff() {
            Ok(())
        } else {
            Err(AppError::Authorization("Staff privileges required".to_string()))
        }
    }
}

impl From<UserClaims> for RequestContext {
    fn from(claims: UserClaims) -> Self {
        Self {
            user_id: Some(claims.user_id),
            roles: claims.roles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(roles: Vec<Role>) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "owner".into(),
            user_id: 1,
            roles,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn test_token_round_trip_keeps_roles() {
        let token = claims(vec![Role::Admin]).create_token("secret").unwrap();
        let decoded = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(decoded.roles, vec![Role::Admin]);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_context_permissions() {
        let anonymous = RequestContext::anonymous();
        assert!(matches!(anonymous.require_admin(), Err(AppError::Authentication(_))));

        let staff: RequestContext = claims(vec![Role::Staff]).into();
        assert!(staff.require_staff().is_ok());
        assert!(matches!(staff.require_admin(), Err(AppError::Authorization(_))));

        let admin: RequestContext = claims(vec![Role::Admin]).into();
        assert!(admin.require_admin().is_ok());
        assert!(admin.require_staff().is_ok());
    }
}
