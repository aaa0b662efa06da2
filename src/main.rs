// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, storage engine, and start HTTP server

mod config;
mod errors;
mod handlers;
mod models;
mod services;
mod storage;

use actix_web::middleware::{from_fn, Logger};
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use config::Config;
use dotenv::dotenv;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.clone()
        } else {
            "info,actix_web=info,sqlx=warn".to_string()
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting hbnb-api...");
    log::info!("Environment: {}", config.environment);
    log::info!("Server Address: {}:{}", config.api_host, config.api_port);

    // 4. Open the configured storage engine (file or db)
    let storage = storage::open(&config)
        .await
        .context("failed to initialize storage")?;

    // 5. Start HTTP server
    let server_addr = format!("{}:{}", config.api_host, config.api_port);
    let app_storage = storage.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (storage handle)
            .app_data(web::Data::new(app_storage.clone()))
            // Middleware: storage teardown runs after every request
            .wrap(from_fn(handlers::close_storage))
            .wrap(Logger::default())
            // Routes
            .configure(handlers::config)
            .default_service(web::route().to(handlers::not_found))
    })
    .bind(&server_addr)
    .with_context(|| format!("failed to bind {}", server_addr))?
    .run()
    .await?;

    // 6. Release storage resources on shutdown
    storage.close().await?;
    storage.shutdown().await;
    log::info!("Server stopped");
    Ok(())
}
