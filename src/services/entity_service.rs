// src/services/entity_service.rs
// DOCUMENTATION: Business logic shared by every resource
// PURPOSE: Intermediary between handlers and the storage engine for states,
// cities, amenities and users, plus the generic lookup/persist helpers

use crate::errors::ApiError;
use crate::models::{
    Amenity, AmenityRequest, City, CityRequest, CreateUserRequest, Model, State, StateRequest,
    UpdateUserRequest, User,
};
use crate::storage::{self, StorageEngine};
use validator::Validate;

pub struct EntityService;

impl EntityService {
    /// Every stored entity of one kind, oldest first
    pub async fn list<T: Model>(storage: &dyn StorageEngine) -> Result<Vec<T>, ApiError> {
        Ok(storage::all_as::<T>(storage).await?)
    }

    /// Load one entity or fail with NotFound
    pub async fn fetch<T: Model>(storage: &dyn StorageEngine, id: &str) -> Result<T, ApiError> {
        storage::get_as::<T>(storage, id)
            .await?
            .ok_or(ApiError::NotFound)
    }

    /// Stage and commit one entity
    pub async fn persist<T: Model>(storage: &dyn StorageEngine, entity: T) -> Result<T, ApiError> {
        storage.new(entity.clone().into()).await;
        storage.save().await?;
        Ok(entity)
    }

    /// Delete one entity (and what it owns) and commit
    pub async fn remove<T: Model>(storage: &dyn StorageEngine, id: &str) -> Result<(), ApiError> {
        let entity = Self::fetch::<T>(storage, id).await?;
        let key = entity.key();
        storage.delete(Some(&entity.into())).await?;
        storage.save().await?;
        log::info!("Deleted {}", key);
        Ok(())
    }

    pub async fn create_state(
        storage: &dyn StorageEngine,
        req: StateRequest,
    ) -> Result<State, ApiError> {
        req.validate()?;
        let name = req.name.ok_or_else(|| ApiError::missing("name"))?;
        let state = Self::persist(storage, State::new(name)).await?;
        log::info!("Created state with id: {}", state.id);
        Ok(state)
    }

    pub async fn update_state(
        storage: &dyn StorageEngine,
        id: &str,
        req: StateRequest,
    ) -> Result<State, ApiError> {
        req.validate()?;
        let mut state = Self::fetch::<State>(storage, id).await?;
        if let Some(name) = req.name {
            state.name = name;
        }
        state.touch();
        Self::persist(storage, state).await
    }

    /// Cities of one state; NotFound when the state does not exist
    pub async fn cities_of_state(
        storage: &dyn StorageEngine,
        state_id: &str,
    ) -> Result<Vec<City>, ApiError> {
        let state = Self::fetch::<State>(storage, state_id).await?;
        let cities = Self::list::<City>(storage).await?;
        Ok(cities
            .into_iter()
            .filter(|city| city.state_id == state.id)
            .collect())
    }

    pub async fn create_city(
        storage: &dyn StorageEngine,
        state_id: &str,
        req: CityRequest,
    ) -> Result<City, ApiError> {
        let state = Self::fetch::<State>(storage, state_id).await?;
        req.validate()?;
        let name = req.name.ok_or_else(|| ApiError::missing("name"))?;
        let city = Self::persist(storage, City::new(state.id, name)).await?;
        log::info!("Created city {} in state {}", city.id, state.id);
        Ok(city)
    }

    pub async fn update_city(
        storage: &dyn StorageEngine,
        id: &str,
        req: CityRequest,
    ) -> Result<City, ApiError> {
        req.validate()?;
        let mut city = Self::fetch::<City>(storage, id).await?;
        if let Some(name) = req.name {
            city.name = name;
        }
        city.touch();
        Self::persist(storage, city).await
    }

    pub async fn create_amenity(
        storage: &dyn StorageEngine,
        req: AmenityRequest,
    ) -> Result<Amenity, ApiError> {
        req.validate()?;
        let name = req.name.ok_or_else(|| ApiError::missing("name"))?;
        let amenity = Self::persist(storage, Amenity::new(name)).await?;
        log::info!("Created amenity with id: {}", amenity.id);
        Ok(amenity)
    }

    pub async fn update_amenity(
        storage: &dyn StorageEngine,
        id: &str,
        req: AmenityRequest,
    ) -> Result<Amenity, ApiError> {
        req.validate()?;
        let mut amenity = Self::fetch::<Amenity>(storage, id).await?;
        if let Some(name) = req.name {
            amenity.name = name;
        }
        amenity.touch();
        Self::persist(storage, amenity).await
    }

    pub async fn create_user(
        storage: &dyn StorageEngine,
        req: CreateUserRequest,
    ) -> Result<User, ApiError> {
        req.validate()?;
        let email = req.email.ok_or_else(|| ApiError::missing("email"))?;
        let password = req.password.ok_or_else(|| ApiError::missing("password"))?;

        let mut user = User::new(email, password);
        user.first_name = req.first_name;
        user.last_name = req.last_name;

        let user = Self::persist(storage, user).await?;
        log::info!("Created user with id: {}", user.id);
        Ok(user)
    }

    pub async fn update_user(
        storage: &dyn StorageEngine,
        id: &str,
        req: UpdateUserRequest,
    ) -> Result<User, ApiError> {
        req.validate()?;
        let mut user = Self::fetch::<User>(storage, id).await?;
        if let Some(password) = req.password {
            user.password = password;
        }
        if let Some(first_name) = req.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = req.last_name {
            user.last_name = Some(last_name);
        }
        user.touch();
        Self::persist(storage, user).await
    }
}
