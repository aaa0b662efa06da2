// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::entity::now;

/// Review of a place written by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub place_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(place_id: Uuid, user_id: Uuid, text: impl Into<String>) -> Self {
        let timestamp = now();
        Self {
            id: Uuid::new_v4(),
            place_id,
            user_id,
            text: text.into(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

/// Request to create a new review; the place comes from the URL
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1, max = 1024))]
    pub text: Option<String>,
}

/// Request to update a review; only the text may change
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[validate(length(min = 1, max = 1024))]
    pub text: Option<String>,
}
