//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{NewUser, User, UserPatch, UserRole};
use crate::interfaces::http::common::ApiError;

/// User API representation
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// admin or user
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            phone: u.phone,
            role: u.role.to_string(),
            created_at: u.created_at,
        }
    }
}

fn parse_role(raw: &str) -> Result<UserRole, ApiError> {
    raw.parse::<UserRole>().map_err(ApiError::validation)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    /// admin or user (default)
    pub role: Option<String>,
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> Result<NewUser, ApiError> {
        let role = match self.role.as_deref() {
            Some(raw) => parse_role(raw)?,
            None => UserRole::default(),
        };
        Ok(NewUser {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            role,
        })
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_patch(self) -> Result<UserPatch, ApiError> {
        Ok(UserPatch {
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            role: self.role.as_deref().map(parse_role).transpose()?,
        })
    }
}

/// Result of deleting a user
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDeletionDto {
    pub user_id: i32,
    pub bookings_deleted: u64,
}
