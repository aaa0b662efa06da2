// src/handlers/cities.rs
// DOCUMENTATION: HTTP handlers for cities
// PURPOSE: Cities are listed and created under their state

use crate::errors::ApiError;
use crate::models::{City, CityRequest};
use crate::services::EntityService;
use crate::storage::SharedStorage;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /states/{state_id}/cities
pub async fn list_cities(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let cities = EntityService::cities_of_state(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(cities))
}

/// POST /states/{state_id}/cities
pub async fn create_city(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
    req: web::Json<CityRequest>,
) -> Result<impl Responder, ApiError> {
    let city =
        EntityService::create_city(storage.get_ref().as_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(city))
}

/// GET /cities/{id}
pub async fn get_city(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let city = EntityService::fetch::<City>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(city))
}

/// PUT /cities/{id}
pub async fn update_city(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
    req: web::Json<CityRequest>,
) -> Result<impl Responder, ApiError> {
    let city =
        EntityService::update_city(storage.get_ref().as_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(city))
}

/// DELETE /cities/{id}
pub async fn delete_city(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    EntityService::remove::<City>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// Configuration for city routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/states/{state_id}/cities", web::get().to(list_cities))
        .route("/states/{state_id}/cities", web::post().to(create_city))
        .service(
            web::scope("/cities")
                .route("/{id}", web::get().to(get_city))
                .route("/{id}", web::put().to(update_city))
                .route("/{id}", web::delete().to(delete_city)),
        );
}
