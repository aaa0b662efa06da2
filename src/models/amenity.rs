// src/models/amenity.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::entity::now;

/// Amenity offered by places (wifi, pool, ...)
/// Linked to places many-to-many through `Place::amenity_ids`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Amenity {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Amenity {
    pub fn new(name: impl Into<String>) -> Self {
        let timestamp = now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

/// Request body for creating or updating an amenity
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AmenityRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
}
