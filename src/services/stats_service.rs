// src/services/stats_service.rs
// DOCUMENTATION: Object counting and status check
// PURPOSE: Back the /status and /api/v1/stats endpoints

use crate::errors::ApiError;
use crate::models::EntityKind;
use crate::storage::StorageEngine;
use serde::{Deserialize, Serialize};

/// Response for the stats endpoint; one count per entity type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub amenities: usize,
    pub cities: usize,
    pub places: usize,
    pub reviews: usize,
    pub states: usize,
    pub users: usize,
}

/// Response for the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

pub struct StatsService;

impl StatsService {
    /// Count stored objects of a named type ("Amenity", "City", ...)
    /// DOCUMENTATION: No caching; every call asks the storage engine
    pub async fn count(storage: &dyn StorageEngine, type_name: &str) -> Result<usize, ApiError> {
        let kind = EntityKind::from_class_name(type_name)
            .ok_or_else(|| ApiError::InvalidInput(format!("unknown type: {}", type_name)))?;
        Ok(storage.count(Some(kind)).await?)
    }

    /// Counts for all six entity types
    pub async fn stats(storage: &dyn StorageEngine) -> Result<StatsResponse, ApiError> {
        Ok(StatsResponse {
            amenities: Self::count(storage, "Amenity").await?,
            cities: Self::count(storage, "City").await?,
            places: Self::count(storage, "Place").await?,
            reviews: Self::count(storage, "Review").await?,
            states: Self::count(storage, "State").await?,
            users: Self::count(storage, "User").await?,
        })
    }

    /// Constant health check; never touches storage
    pub fn status() -> StatusResponse {
        StatusResponse {
            status: "OK".to_string(),
        }
    }
}
