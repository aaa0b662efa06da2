// src/handlers/teardown.rs
// DOCUMENTATION: Per-request storage teardown
// PURPOSE: Call `close()` on the storage engine once every request is done

use crate::storage::{RequestScope, SharedStorage};
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::{web, Error};

/// Middleware: run the request in its own storage scope, then release it
/// DOCUMENTATION: Everything the handler stages lives in a fresh
/// `RequestScope`, so closing it never touches another request's changes.
/// Runs on success and on error responses alike. A failing close is logged
/// and does not change the response already produced.
pub async fn close_storage(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let storage = req.app_data::<web::Data<SharedStorage>>().cloned();
    let scope = RequestScope::new();

    scope
        .run(async move {
            let response = next.call(req).await;

            if let Some(storage) = storage {
                if let Err(e) = storage.close().await {
                    log::warn!("Storage teardown failed for scope {}: {}", scope.id(), e);
                }
            }

            response
        })
        .await
}
