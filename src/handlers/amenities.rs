// src/handlers/amenities.rs
// DOCUMENTATION: HTTP handlers for amenities

use crate::errors::ApiError;
use crate::models::{Amenity, AmenityRequest};
use crate::services::EntityService;
use crate::storage::SharedStorage;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /amenities
pub async fn list_amenities(
    storage: web::Data<SharedStorage>,
) -> Result<impl Responder, ApiError> {
    let amenities = EntityService::list::<Amenity>(storage.get_ref().as_ref()).await?;
    Ok(HttpResponse::Ok().json(amenities))
}

/// GET /amenities/{id}
pub async fn get_amenity(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let amenity = EntityService::fetch::<Amenity>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(amenity))
}

/// POST /amenities
pub async fn create_amenity(
    storage: web::Data<SharedStorage>,
    req: web::Json<AmenityRequest>,
) -> Result<impl Responder, ApiError> {
    let amenity =
        EntityService::create_amenity(storage.get_ref().as_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(amenity))
}

/// PUT /amenities/{id}
pub async fn update_amenity(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
    req: web::Json<AmenityRequest>,
) -> Result<impl Responder, ApiError> {
    let amenity =
        EntityService::update_amenity(storage.get_ref().as_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(amenity))
}

/// DELETE /amenities/{id}
pub async fn delete_amenity(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    EntityService::remove::<Amenity>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/amenities")
            .route("", web::get().to(list_amenities))
            .route("", web::post().to(create_amenity))
            .route("/{id}", web::get().to(get_amenity))
            .route("/{id}", web::put().to(update_amenity))
            .route("/{id}", web::delete().to(delete_amenity)),
    );
}
