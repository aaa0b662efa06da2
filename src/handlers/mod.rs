// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components and assemble the route table

pub mod amenities;
pub mod cities;
pub mod index;
pub mod place_amenities;
pub mod places;
pub mod reviews;
pub mod states;
pub mod teardown;
pub mod users;

pub use index::not_found;
pub use teardown::close_storage;

use crate::errors::ApiError;
use actix_web::web;

/// Body extractor settings: any unreadable JSON body is a 400 "Not a JSON"
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("Rejected request body: {}", err);
        ApiError::BadRequest("Not a JSON".to_string()).into()
    })
}

/// Register every route: /status at the root, the rest under /api/v1
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .configure(index::config)
        .service(
            web::scope("/api/v1")
                .configure(index::api_config)
                .configure(states::config)
                .configure(cities::config)
                .configure(amenities::config)
                .configure(users::config)
                .configure(places::config)
                .configure(reviews::config)
                .configure(place_amenities::config),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntityKind, State};
    use crate::storage::{FileStorage, SharedStorage, StorageEngine};
    use actix_web::http::{header::ContentType, StatusCode};
    use actix_web::middleware::from_fn;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn temp_storage() -> (TempDir, SharedStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage: SharedStorage = Arc::new(FileStorage::new(dir.path().join("file.json")));
        storage.reload().await.unwrap();
        (dir, storage)
    }

    macro_rules! test_app {
        ($storage:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($storage.clone()))
                    .wrap(from_fn(close_storage))
                    .configure(config)
                    .default_service(web::route().to(not_found)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_status() {
        let (_dir, storage) = temp_storage().await;
        let app = test_app!(storage);

        for uri in ["/status", "/api/v1/status"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "status": "OK" }));
        }
    }

    #[actix_web::test]
    async fn test_stats_on_empty_store() {
        let (_dir, storage) = temp_storage().await;
        let app = test_app!(storage);

        let req = test::TestRequest::get().uri("/api/v1/stats").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({
                "amenities": 0,
                "cities": 0,
                "places": 0,
                "reviews": 0,
                "states": 0,
                "users": 0
            })
        );
    }

    #[actix_web::test]
    async fn test_unknown_route_returns_json_404() {
        let (_dir, storage) = temp_storage().await;
        let app = test_app!(storage);

        let req = test::TestRequest::get().uri("/api/v1/nop").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Not found" }));
    }

    #[actix_web::test]
    async fn test_bad_bodies() {
        let (_dir, storage) = temp_storage().await;
        let app = test_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/v1/states")
            .insert_header(ContentType::json())
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Not a JSON" }));

        let req = test::TestRequest::post()
            .uri("/api/v1/states")
            .set_json(json!({ "capital": "Sacramento" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Missing name" }));
    }

    #[actix_web::test]
    async fn test_missing_entity_is_404() {
        let (_dir, storage) = temp_storage().await;
        let app = test_app!(storage);

        for uri in [
            "/api/v1/states/0b7c2c36-0000-4000-8000-000000000000",
            "/api/v1/places/not-a-uuid",
            "/api/v1/states/not-a-uuid/cities",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        }

        let req = test::TestRequest::delete()
            .uri("/api/v1/amenities/0b7c2c36-0000-4000-8000-000000000000")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_full_lifecycle_and_cascade() {
        let (_dir, storage) = temp_storage().await;
        let app = test_app!(storage);

        let req = test::TestRequest::post()
            .uri("/api/v1/states")
            .set_json(json!({ "name": "California" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let state: Value = test::read_body_json(resp).await;
        let state_id = state["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/states/{}/cities", state_id))
            .set_json(json!({ "name": "San Francisco" }))
            .to_request();
        let city: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(city["state_id"], state["id"]);
        let city_id = city["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/api/v1/users")
            .set_json(json!({ "email": "host@example.com", "password": "pw" }))
            .to_request();
        let user: Value = test::call_and_read_body_json(&app, req).await;
        assert!(user.get("password").is_none());
        let user_id = user["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/cities/{}/places", city_id))
            .set_json(json!({ "user_id": user_id, "name": "Loft", "max_guest": 2 }))
            .to_request();
        let place: Value = test::call_and_read_body_json(&app, req).await;
        let place_id = place["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/places/{}/reviews", place_id))
            .set_json(json!({ "user_id": user_id, "text": "Great view" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/v1/amenities")
            .set_json(json!({ "name": "Wifi" }))
            .to_request();
        let amenity: Value = test::call_and_read_body_json(&app, req).await;
        let amenity_id = amenity["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/places/{}/amenities/{}", place_id, amenity_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::get().uri("/api/v1/stats").to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            stats,
            json!({
                "amenities": 1,
                "cities": 1,
                "places": 1,
                "reviews": 1,
                "states": 1,
                "users": 1
            })
        );

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/places/{}", place_id))
            .set_json(json!({ "price_by_night": 99, "id": "ignored" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["price_by_night"], 99);
        assert_eq!(updated["id"], place["id"]);
        assert_eq!(updated["amenity_ids"], json!([amenity_id]));

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/states/{}", state_id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({}));

        let req = test::TestRequest::get().uri("/api/v1/stats").to_request();
        let stats: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            stats,
            json!({
                "amenities": 1,
                "cities": 0,
                "places": 0,
                "reviews": 0,
                "states": 0,
                "users": 1
            })
        );
    }

    #[actix_web::test]
    async fn test_teardown_leaves_other_callers_staging_alone() {
        let (_dir, storage) = temp_storage().await;
        let app = test_app!(storage);

        storage.new(State::new("Staged").into()).await;
        assert_eq!(storage.count(Some(EntityKind::State)).await.unwrap(), 1);

        let req = test::TestRequest::get().uri("/status").to_request();
        test::call_service(&app, req).await;
        assert_eq!(storage.count(Some(EntityKind::State)).await.unwrap(), 1);

        // Requests do not see it either
        let req = test::TestRequest::get().uri("/api/v1/states").to_request();
        let states: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(states, json!([]));

        storage.close().await.unwrap();
        assert_eq!(storage.count(Some(EntityKind::State)).await.unwrap(), 0);
    }
}
