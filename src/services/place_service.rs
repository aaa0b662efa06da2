// src/services/place_service.rs
// DOCUMENTATION: Business logic for places, their reviews and amenities
// PURPOSE: Resolve place relations explicitly through the storage engine

use crate::errors::ApiError;
use crate::models::{
    Amenity, City, CreatePlaceRequest, CreateReviewRequest, Model, Place, Review,
    UpdatePlaceRequest, UpdateReviewRequest, User,
};
use crate::services::EntityService;
use crate::storage::StorageEngine;
use validator::Validate;

pub struct PlaceService;

impl PlaceService {
    /// Places located in one city
    pub async fn places_of_city(
        storage: &dyn StorageEngine,
        city_id: &str,
    ) -> Result<Vec<Place>, ApiError> {
        let city = EntityService::fetch::<City>(storage, city_id).await?;
        let places = EntityService::list::<Place>(storage).await?;
        Ok(places
            .into_iter()
            .filter(|place| place.city_id == city.id)
            .collect())
    }

    /// Create a new place in a city
    /// DOCUMENTATION: The owner must exist; checks run in the order
    /// city, user_id present, user exists, name present
    pub async fn create_place(
        storage: &dyn StorageEngine,
        city_id: &str,
        req: CreatePlaceRequest,
    ) -> Result<Place, ApiError> {
        let city = EntityService::fetch::<City>(storage, city_id).await?;
        req.validate()?;

        let user_id = req.user_id.ok_or_else(|| ApiError::missing("user_id"))?;
        let owner = EntityService::fetch::<User>(storage, &user_id.to_string()).await?;
        let name = req.name.ok_or_else(|| ApiError::missing("name"))?;

        let mut place = Place::new(city.id, owner.id, name);
        place.description = req.description;
        place.number_rooms = req.number_rooms.unwrap_or(0);
        place.number_bathrooms = req.number_bathrooms.unwrap_or(0);
        place.max_guest = req.max_guest.unwrap_or(0);
        place.price_by_night = req.price_by_night.unwrap_or(0);
        place.latitude = req.latitude;
        place.longitude = req.longitude;

        let place = EntityService::persist(storage, place).await?;
        log::info!("Created place with id: {}", place.id);
        Ok(place)
    }

    /// Update a place
    pub async fn update_place(
        storage: &dyn StorageEngine,
        id: &str,
        req: UpdatePlaceRequest,
    ) -> Result<Place, ApiError> {
        req.validate()?;
        let mut place = EntityService::fetch::<Place>(storage, id).await?;
        req.apply(&mut place);
        place.touch();
        EntityService::persist(storage, place).await
    }

    /// Reviews written for one place
    pub async fn reviews_of_place(
        storage: &dyn StorageEngine,
        place_id: &str,
    ) -> Result<Vec<Review>, ApiError> {
        let place = EntityService::fetch::<Place>(storage, place_id).await?;
        let reviews = EntityService::list::<Review>(storage).await?;
        Ok(reviews
            .into_iter()
            .filter(|review| review.place_id == place.id)
            .collect())
    }

    /// Create a new review for a place
    pub async fn create_review(
        storage: &dyn StorageEngine,
        place_id: &str,
        req: CreateReviewRequest,
    ) -> Result<Review, ApiError> {
        let place = EntityService::fetch::<Place>(storage, place_id).await?;
        req.validate()?;

        let user_id = req.user_id.ok_or_else(|| ApiError::missing("user_id"))?;
        let author = EntityService::fetch::<User>(storage, &user_id.to_string()).await?;
        let text = req.text.ok_or_else(|| ApiError::missing("text"))?;

        let review = EntityService::persist(storage, Review::new(place.id, author.id, text)).await?;
        log::info!("Created review {} for place {}", review.id, place.id);
        Ok(review)
    }

    /// Update a review's text
    pub async fn update_review(
        storage: &dyn StorageEngine,
        id: &str,
        req: UpdateReviewRequest,
    ) -> Result<Review, ApiError> {
        req.validate()?;
        let mut review = EntityService::fetch::<Review>(storage, id).await?;
        if let Some(text) = req.text {
            review.text = text;
        }
        review.touch();
        EntityService::persist(storage, review).await
    }

    /// Amenities linked to a place
    pub async fn amenities_of_place(
        storage: &dyn StorageEngine,
        place_id: &str,
    ) -> Result<Vec<Amenity>, ApiError> {
        let place = EntityService::fetch::<Place>(storage, place_id).await?;
        let amenities = EntityService::list::<Amenity>(storage).await?;
        Ok(amenities
            .into_iter()
            .filter(|amenity| place.amenity_ids.contains(&amenity.id))
            .collect())
    }

    /// Link an amenity to a place
    /// DOCUMENTATION: Returns the amenity and whether a new link was created;
    /// linking twice is not an error
    pub async fn link_amenity(
        storage: &dyn StorageEngine,
        place_id: &str,
        amenity_id: &str,
    ) -> Result<(Amenity, bool), ApiError> {
        let mut place = EntityService::fetch::<Place>(storage, place_id).await?;
        let amenity = EntityService::fetch::<Amenity>(storage, amenity_id).await?;

        if place.amenity_ids.contains(&amenity.id) {
            return Ok((amenity, false));
        }

        place.amenity_ids.push(amenity.id);
        place.touch();
        EntityService::persist(storage, place).await?;
        Ok((amenity, true))
    }

    /// Remove the link between an amenity and a place
    /// DOCUMENTATION: NotFound when either side is missing or they are not linked
    pub async fn unlink_amenity(
        storage: &dyn StorageEngine,
        place_id: &str,
        amenity_id: &str,
    ) -> Result<(), ApiError> {
        let mut place = EntityService::fetch::<Place>(storage, place_id).await?;
        let amenity = EntityService::fetch::<Amenity>(storage, amenity_id).await?;

        if !place.amenity_ids.contains(&amenity.id) {
            return Err(ApiError::NotFound);
        }

        place.amenity_ids.retain(|id| *id != amenity.id);
        place.touch();
        EntityService::persist(storage, place).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityKind, State};
    use crate::storage::FileStorage;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        storage: FileStorage,
        city: City,
        owner: User,
    }

    async fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("file.json"));
        storage.reload().await.unwrap();

        let state = State::new("California");
        let city = City::new(state.id, "San Francisco");
        let owner = User::new("host@example.com", "pw");
        storage.new(state.into()).await;
        storage.new(city.clone().into()).await;
        storage.new(owner.clone().into()).await;
        storage.save().await.unwrap();

        Fixture {
            _dir: dir,
            storage,
            city,
            owner,
        }
    }

    fn loft(owner: &User) -> CreatePlaceRequest {
        CreatePlaceRequest {
            user_id: Some(owner.id),
            name: Some("Loft".to_string()),
            max_guest: Some(3),
            price_by_night: Some(150),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_place_in_city() {
        let fx = fixture().await;

        let place = PlaceService::create_place(&fx.storage, &fx.city.id.to_string(), loft(&fx.owner))
            .await
            .unwrap();
        assert_eq!(place.city_id, fx.city.id);
        assert_eq!(place.user_id, fx.owner.id);
        assert_eq!(place.max_guest, 3);
        assert_eq!(place.number_rooms, 0);

        let places = PlaceService::places_of_city(&fx.storage, &fx.city.id.to_string())
            .await
            .unwrap();
        assert_eq!(places, vec![place]);
    }

    #[tokio::test]
    async fn test_create_place_validation_order() {
        let fx = fixture().await;
        let city_id = fx.city.id.to_string();

        let err = PlaceService::create_place(&fx.storage, &city_id, CreatePlaceRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing user_id");

        let err = PlaceService::create_place(
            &fx.storage,
            &city_id,
            CreatePlaceRequest {
                user_id: Some(uuid::Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));

        let err = PlaceService::create_place(
            &fx.storage,
            &city_id,
            CreatePlaceRequest {
                user_id: Some(fx.owner.id),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing name");
    }

    #[tokio::test]
    async fn test_reviews_follow_their_place() {
        let fx = fixture().await;
        let place = PlaceService::create_place(&fx.storage, &fx.city.id.to_string(), loft(&fx.owner))
            .await
            .unwrap();

        let review = PlaceService::create_review(
            &fx.storage,
            &place.id.to_string(),
            CreateReviewRequest {
                user_id: Some(fx.owner.id),
                text: Some("Great view".to_string()),
            },
        )
        .await
        .unwrap();

        let reviews = PlaceService::reviews_of_place(&fx.storage, &place.id.to_string())
            .await
            .unwrap();
        assert_eq!(reviews, vec![review]);

        EntityService::remove::<Place>(&fx.storage, &place.id.to_string())
            .await
            .unwrap();
        assert_eq!(fx.storage.count(Some(EntityKind::Review)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_link_and_unlink_amenity() {
        let fx = fixture().await;
        let place = PlaceService::create_place(&fx.storage, &fx.city.id.to_string(), loft(&fx.owner))
            .await
            .unwrap();
        let wifi = EntityService::persist(&fx.storage, Amenity::new("Wifi"))
            .await
            .unwrap();
        let place_id = place.id.to_string();
        let wifi_id = wifi.id.to_string();

        let (_, created) = PlaceService::link_amenity(&fx.storage, &place_id, &wifi_id)
            .await
            .unwrap();
        assert!(created);
        let (_, created) = PlaceService::link_amenity(&fx.storage, &place_id, &wifi_id)
            .await
            .unwrap();
        assert!(!created);

        let amenities = PlaceService::amenities_of_place(&fx.storage, &place_id)
            .await
            .unwrap();
        assert_eq!(amenities, vec![wifi]);

        PlaceService::unlink_amenity(&fx.storage, &place_id, &wifi_id)
            .await
            .unwrap();
        let err = PlaceService::unlink_amenity(&fx.storage, &place_id, &wifi_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        assert!(PlaceService::amenities_of_place(&fx.storage, &place_id)
            .await
            .unwrap()
            .is_empty());
    }
}
