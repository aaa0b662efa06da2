// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::entity::now;

/// Registered user
/// DOCUMENTATION: `password` holds the stored credential string and is
/// persisted by both backends; it is stripped by `to_response()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create a new user
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub password: Option<String>,
    #[validate(length(max = 128))]
    pub first_name: Option<String>,
    #[validate(length(max = 128))]
    pub last_name: Option<String>,
}

/// Request to update a user; the email is fixed at creation
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 128))]
    pub password: Option<String>,
    #[validate(length(max = 128))]
    pub first_name: Option<String>,
    #[validate(length(max = 128))]
    pub last_name: Option<String>,
}

/// User DTO exposed via API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        let timestamp = now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password: password.into(),
            first_name: None,
            last_name: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Convert stored user into API response
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
