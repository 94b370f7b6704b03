#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the NC resilience dashboard.
//!
//! A JSON backend for the dashboard frontend: it fetches county data from
//! the upstream resilience API, buckets and aggregates it, and serves view
//! models, report exports, the self-assessment and assistance lookups.
//! The server holds no data of its own; every request goes upstream.

mod handlers;
pub mod interactive;
pub mod services;
pub mod views;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use nc_resilience_api::{API_URL_ENV, ApiClient, DEFAULT_API_URL, ResilienceApi};

/// Default bind address when `BIND_ADDR` is not set.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1";

/// Default port when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 8080;

/// Shared application state.
pub struct AppState {
    /// Upstream resilience API.
    pub api: Arc<dyn ResilienceApi>,
}

/// Where the server listens and which upstream it talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
    pub api_url: String,
}

impl ServerConfig {
    /// Reads `BIND_ADDR`, `PORT` and `RESILIENCE_API_URL`, falling back to
    /// the defaults for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            api_url: std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        }
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/map", web::get().to(handlers::map))
            .route("/counties/{fips}", web::get().to(handlers::county_details))
            .route(
                "/counties/{fips}/dashboard",
                web::get().to(handlers::dashboard),
            )
            .route(
                "/counties/{fips}/export/{format}",
                web::get().to(handlers::export),
            )
            .route("/rankings", web::get().to(handlers::rankings))
            .route("/analytics", web::get().to(handlers::analytics))
            .route(
                "/assessment/steps",
                web::get().to(handlers::assessment_steps),
            )
            .route("/assessment", web::post().to(handlers::assessment))
            .route("/programs", web::get().to(handlers::programs))
            .route("/crisis", web::get().to(handlers::crisis)),
    );
}

/// Starts the dashboard server.
///
/// This is a regular async function; the caller provides the runtime (e.g.
/// via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    log::info!("Using resilience API at {}", config.api_url);
    let state = web::Data::new(AppState {
        api: Arc::new(ApiClient::new(&config.api_url)),
    });

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr, config.port))?
    .run()
    .await
}
