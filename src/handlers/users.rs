// src/handlers/users.rs
// DOCUMENTATION: HTTP handlers for users
// PURPOSE: Responses go through UserResponse so the password never leaves

use crate::errors::ApiError;
use crate::models::{CreateUserRequest, UpdateUserRequest, User, UserResponse};
use crate::services::EntityService;
use crate::storage::SharedStorage;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /users
pub async fn list_users(storage: web::Data<SharedStorage>) -> Result<impl Responder, ApiError> {
    let users = EntityService::list::<User>(storage.get_ref().as_ref()).await?;
    let body: Vec<UserResponse> = users.iter().map(User::to_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /users/{id}
pub async fn get_user(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    let user = EntityService::fetch::<User>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(user.to_response()))
}

/// POST /users
pub async fn create_user(
    storage: web::Data<SharedStorage>,
    req: web::Json<CreateUserRequest>,
) -> Result<impl Responder, ApiError> {
    let user = EntityService::create_user(storage.get_ref().as_ref(), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(user.to_response()))
}

/// PUT /users/{id}
pub async fn update_user(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
    req: web::Json<UpdateUserRequest>,
) -> Result<impl Responder, ApiError> {
    let user =
        EntityService::update_user(storage.get_ref().as_ref(), &path, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user.to_response()))
}

/// DELETE /users/{id}
/// Also removes the user's places and reviews
pub async fn delete_user(
    storage: web::Data<SharedStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    EntityService::remove::<User>(storage.get_ref().as_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(json!({})))
}

/// Configuration for user routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("", web::post().to(create_user))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user)),
    );
}
