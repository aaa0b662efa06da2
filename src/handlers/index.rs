// src/handlers/index.rs
// DOCUMENTATION: Status, statistics and fallback handlers
// PURPOSE: Health check, object counts, JSON 404 for unmatched routes

use crate::errors::ApiError;
use crate::services::StatsService;
use crate::storage::SharedStorage;
use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /status
pub async fn status() -> impl Responder {
    HttpResponse::Ok().json(StatsService::status())
}

/// GET /api/v1/stats
/// Number of stored objects per type
pub async fn stats(storage: web::Data<SharedStorage>) -> Result<impl Responder, ApiError> {
    let stats = StatsService::stats(storage.get_ref().as_ref()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Default service for unmatched routes
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Not found" }))
}

/// Routes served at the root
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/status", web::get().to(status));
}

/// Routes served under /api/v1
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/status", web::get().to(status))
        .route("/stats", web::get().to(stats));
}
