//! User model, session claims and related request types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use super::enums::Role;

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    pub department_id: Option<String>,
    pub designation: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User list query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Search by name or email
    pub search: Option<String>,
    pub department_id: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

/// Create user request (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    pub role: Role,
    pub department_id: Option<String>,
    pub designation: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
}

/// Update user request; only supplied fields change
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: Option<String>,
    pub role: Option<Role>,
    pub department_id: Option<String>,
    pub designation: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
}

/// JWT claims for authenticated users; the request-scoped session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub department_id: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn for_user(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.id.to_string(),
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            department_id: user.department_id.clone(),
            exp: now + (expiration_hours as i64 * 3600),
            iat: now,
        }
    }

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

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }

    /// ADMIN may act on any department; DEPT_HEAD only on the one assigned
    pub fn require_department(&self, department_id: &str) -> Result<(), AppError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::DeptHead if self.department_id.as_deref() == Some(department_id) => Ok(()),
            Role::DeptHead => Err(AppError::Authorization(format!(
                "You are not allowed to manage records of department '{}'",
                department_id
            ))),
        }
    }

    /// Department filter to apply to a listing.
    ///
    /// Admins get the requested filter (or none); department heads are
    /// pinned to their own department and may not ask for another one.
    pub fn list_scope(&self, requested: Option<&str>) -> Result<Option<String>, AppError> {
        match self.role {
            Role::Admin => Ok(requested.map(str::to_string)),
            Role::DeptHead => {
                let own = self.department_id.as_deref().ok_or_else(|| {
                    AppError::Authorization("No department is assigned to this account".to_string())
                })?;
                match requested {
                    Some(other) if other != own => Err(AppError::Authorization(format!(
                        "You are not allowed to view records of department '{}'",
                        other
                    ))),
                    _ => Ok(Some(own.to_string())),
                }
            }
        }
    }
}
