// src/handlers/states.rs
// DOCUMENTATION: HTTP handlers for states
// PURPOSE: Parse requests, call services, return responses

use crate::errors::ApiError;
use crate::models::{State, StateRequest};
use crate::services::EntityService;
use crate::storage::SharedStorage;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /states
pub async fn list_states(storage: web::Data<SharedStorage>) -> Result<impl Responder, ApiError> {
    let states = EntityService::list::<State>(storage.get_ref().as_ref()).await?;
    Ok(HttpResponse::Ok().json(states))
}

/// GET /states/{id}
pub async fn get_state(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let state = EntityService::fetch::<State>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(state))
}

/// POST /states
pub async fn create_state(
    storage: web::Data<SharedStorage>,
    req: web::Json<StateRequest>,
) -> Result<impl Responder, ApiError> {
    let state = EntityService::create_state(storage.get_ref().as_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(state))
}

/// PUT /states/{id}
pub async fn update_state(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
    req: web::Json<StateRequest>,
) -> Result<impl Responder, ApiError> {
    let state =
        EntityService::update_state(storage.get_ref().as_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(state))
}

/// DELETE /states/{id}
/// Also removes the state's cities and everything under them
pub async fn delete_state(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    EntityService::remove::<State>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// Configuration for state routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/states")
            .route("", web::get().to(list_states))
            .route("", web::post().to(create_state))
            .route("/{id}", web::get().to(get_state))
            .route("/{id}", web::put().to(update_state))
            .route("/{id}", web::delete().to(delete_state)),
    );
}
