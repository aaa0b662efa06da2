// src/handlers/places.rs
// DOCUMENTATION: HTTP handlers for place operations
// PURPOSE: Parse requests, call services, return responses

use crate::errors::ApiError;
use crate::models::{CreatePlaceRequest, Place, UpdatePlaceRequest};
use crate::services::{EntityService, PlaceService};
use crate::storage::SharedStorage;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /cities/{city_id}/places
/// List the places of a city
pub async fn list_places(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let places = PlaceService::places_of_city(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(places))
}

/// POST /cities/{city_id}/places
/// Create a new place
pub async fn create_place(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
    req: web::Json<CreatePlaceRequest>,
) -> Result<impl Responder, ApiError> {
    let place =
        PlaceService::create_place(storage.get_ref().as_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(place))
}

/// GET /places/{id}
/// Retrieve a place by ID
pub async fn get_place(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let place = EntityService::fetch::<Place>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(place))
}

/// PUT /places/{id}
/// Update a place
pub async fn update_place(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
    req: web::Json<UpdatePlaceRequest>,
) -> Result<impl Responder, ApiError> {
    let place =
        PlaceService::update_place(storage.get_ref().as_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(place))
}

/// DELETE /places/{id}
/// Delete a place together with its reviews
pub async fn delete_place(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    EntityService::remove::<Place>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// Configuration for place routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/cities/{city_id}/places", web::get().to(list_places))
        .route("/cities/{city_id}/places", web::post().to(create_place))
        .route("/places/{id}", web::get().to(get_place))
        .route("/places/{id}", web::put().to(update_place))
        .route("/places/{id}", web::delete().to(delete_place));
}
