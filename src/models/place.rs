// src/models/place.rs
// DOCUMENTATION: Core data structures for places
// PURPOSE: Place record plus the request bodies used to create and edit it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::entity::now;

/// Represents a rentable place
/// DOCUMENTATION: Maps to the `places` table. `amenity_ids` is not a column:
/// the database backend fills it from `place_amenity` with an explicit join,
/// the file backend stores it inline with the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Place {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// City the place is located in
    pub city_id: Uuid,

    /// Owner of the place
    pub user_id: Uuid,

    /// Listing title
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Capacity fields, all non-negative
    pub number_rooms: i32,
    pub number_bathrooms: i32,
    pub max_guest: i32,

    /// Nightly price in whole currency units
    pub price_by_night: i32,

    /// Geographic coordinates
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Linked amenities (many-to-many)
    #[sqlx(skip)]
    #[serde(default)]
    pub amenity_ids: Vec<Uuid>,

    /// When record was created
    pub created_at: DateTime<Utc>,

    /// When record was last modified
    pub updated_at: DateTime<Utc>,
}

impl Place {
    pub fn new(city_id: Uuid, user_id: Uuid, name: impl Into<String>) -> Self {
        let timestamp = now();
        Self {
            id: Uuid::new_v4(),
            city_id,
            user_id,
            name: name.into(),
            description: None,
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: None,
            longitude: None,
            amenity_ids: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }
}

/// Request to create a new place
/// DOCUMENTATION: The city comes from the URL; `user_id` and `name` are
/// required and checked by the service layer so it can report which is missing
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CreatePlaceRequest {
    pub user_id: Option<Uuid>,

    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[validate(length(max = 1024))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub number_rooms: Option<i32>,

    #[validate(range(min = 0))]
    pub number_bathrooms: Option<i32>,

    #[validate(range(min = 0))]
    pub max_guest: Option<i32>,

    #[validate(range(min = 0))]
    pub price_by_night: Option<i32>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// Request to update a place
/// DOCUMENTATION: All fields optional; only provided fields are changed.
/// Owner and city are fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePlaceRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: Option<String>,

    #[validate(length(max = 1024))]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub number_rooms: Option<i32>,

    #[validate(range(min = 0))]
    pub number_bathrooms: Option<i32>,

    #[validate(range(min = 0))]
    pub max_guest: Option<i32>,

    #[validate(range(min = 0))]
    pub price_by_night: Option<i32>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

impl UpdatePlaceRequest {
    /// Copy every provided field onto `place`
    pub fn apply(self, place: &mut Place) {
        if let Some(name) = self.name {
            place.name = name;
        }
        if let Some(description) = self.description {
            place.description = Some(description);
        }
        if let Some(number_rooms) = self.number_rooms {
            place.number_rooms = number_rooms;
        }
        if let Some(number_bathrooms) = self.number_bathrooms {
            place.number_bathrooms = number_bathrooms;
        }
        if let Some(max_guest) = self.max_guest {
            place.max_guest = max_guest;
        }
        if let Some(price_by_night) = self.price_by_night {
            place.price_by_night = price_by_night;
        }
        if let Some(latitude) = self.latitude {
            place.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            place.longitude = Some(longitude);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_only_touches_provided_fields() {
        let mut place = Place::new(Uuid::new_v4(), Uuid::new_v4(), "Cabin");
        place.max_guest = 4;

        UpdatePlaceRequest {
            price_by_night: Some(120),
            latitude: Some(37.77),
            ..Default::default()
        }
        .apply(&mut place);

        assert_eq!(place.name, "Cabin");
        assert_eq!(place.max_guest, 4);
        assert_eq!(place.price_by_night, 120);
        assert_eq!(place.latitude, Some(37.77));
        assert_eq!(place.longitude, None);
    }

    #[test]
    fn test_negative_capacity_is_rejected() {
        let req = CreatePlaceRequest {
            user_id: Some(Uuid::new_v4()),
            name: Some("Loft".to_string()),
            max_guest: Some(-1),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_place_without_amenities_deserializes() {
        let place = Place::new(Uuid::new_v4(), Uuid::new_v4(), "Studio");
        let mut value = serde_json::to_value(&place).unwrap();
        value.as_object_mut().unwrap().remove("amenity_ids");

        let back: Place = serde_json::from_value(value).unwrap();
        assert!(back.amenity_ids.is_empty());
        assert_eq!(back.id, place.id);
    }
}
