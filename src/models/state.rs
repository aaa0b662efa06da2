// src/models/state.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::entity::now;

/// A state; owns its cities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct State {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl State {
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

/// Request body for creating or updating a state
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StateRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,
}
