// src/handlers/place_amenities.rs
// DOCUMENTATION: HTTP handlers for the place <-> amenity link

use crate::errors::ApiError;
use crate::services::PlaceService;
use crate::storage::SharedStorage;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /places/{place_id}/amenities
pub async fn list_place_amenities(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let amenities = PlaceService::amenities_of_place(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(amenities))
}

/// POST /places/{place_id}/amenities/{amenity_id}
/// 201 when the link is new, 200 when it already existed
pub async fn link_amenity(
    storage: web::Data<SharedStorage>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, ApiError> {
    let (place_id, amenity_id) = path.into_inner();
    let (amenity, created) =
        PlaceService::link_amenity(storage.get_ref().as_ref(), &place_id, &amenity_id).await?;

    if created {
        Ok(HttpResponse::Created().json(amenity))
    } else {
        Ok(HttpResponse::Ok().json(amenity))
    }
}

/// DELETE /places/{place_id}/amenities/{amenity_id}
pub async fn unlink_amenity(
    storage: web::Data<SharedStorage>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, ApiError> {
    let (place_id, amenity_id) = path.into_inner();
    PlaceService::unlink_amenity(storage.get_ref().as_ref(), &place_id, &amenity_id).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/places/{place_id}/amenities",
        web::get().to(list_place_amenities),
    )
    .route(
        "/places/{place_id}/amenities/{amenity_id}",
        web::post().to(link_amenity),
    )
    .route(
        "/places/{place_id}/amenities/{amenity_id}",
        web::delete().to(unlink_amenity),
    );
}
