// src/models/city.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::entity::now;

/// A city, always belonging to exactly one state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct City {
    pub id: Uuid,
    pub state_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl City {
    pub fn new(state_id: Uuid, name: impl Into<String>) -> Self {
        let timestamp = now();
        Self {
            id: Uuid::new_v4(),
            state_id,
            name: name.into(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

/// Request body for creating or updating a city
/// The owning state comes from the URL, never from the body
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CityRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
}
