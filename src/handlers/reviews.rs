// src/handlers/reviews.rs
// DOCUMENTATION: HTTP handlers for reviews

use crate::errors::ApiError;
use crate::models::{CreateReviewRequest, Review, UpdateReviewRequest};
use crate::services::{EntityService, PlaceService};
use crate::storage::SharedStorage;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /places/{place_id}/reviews
pub async fn list_reviews(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let reviews = PlaceService::reviews_of_place(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// POST /places/{place_id}/reviews
pub async fn create_review(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
    req: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, ApiError> {
    let review =
        PlaceService::create_review(storage.get_ref().as_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(review))
}

/// GET /reviews/{id}
pub async fn get_review(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let review = EntityService::fetch::<Review>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(review))
}

/// PUT /reviews/{id}
pub async fn update_review(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
    req: web::Json<UpdateReviewRequest>,
) -> Result<impl Responder, ApiError> {
    let review =
        PlaceService::update_review(storage.get_ref().as_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(review))
}

/// DELETE /reviews/{id}
pub async fn delete_review(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    EntityService::remove::<Review>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/places/{place_id}/reviews", web::get().to(list_reviews))
        .route("/places/{place_id}/reviews", web::post().to(create_review))
        .route("/reviews/{id}", web::get().to(get_review))
        .route("/reviews/{id}", web::put().to(update_review))
        .route("/reviews/{id}", web::delete().to(delete_review));
}
