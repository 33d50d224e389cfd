#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the carbon tracker.
//!
//! Exposes the annual estimator, per-session monthly footprint (transport
//! ledger plus household inputs), the two-point map distance, and the chat
//! tips adapter as a JSON API. Session state lives in memory only and is
//! discarded when a session ends or the process exits.

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use carbon_tracker_ai::TipsAdapter;
use carbon_tracker_footprint::EmissionCoefficients;
use carbon_tracker_session::SessionStore;
use carbon_tracker_session::store::DEFAULT_IDLE_TTL;

/// Shared application state.
pub struct AppState {
    /// Emission factors, fixed for the life of the process.
    pub coefficients: Arc<EmissionCoefficients>,
    /// Live sessions.
    pub sessions: Arc<SessionStore>,
    /// Chat-completion adapter.
    pub tips: TipsAdapter,
}

/// Registers every API route under `/api`, with extractor failures
/// reported as JSON [`ApiError`](carbon_tracker_server_models::ApiError)
/// bodies.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::json_error))
        .app_data(web::PathConfig::default().error_handler(handlers::path_error));

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/coefficients", web::get().to(handlers::coefficients))
            .route("/annual", web::post().to(handlers::annual))
            .route("/sessions", web::post().to(handlers::create_session))
            .service(
                web::scope("/sessions/{id}")
                    .route("", web::delete().to(handlers::end_session))
                    .route("/reset", web::post().to(handlers::reset_session))
                    .route("/transport", web::get().to(handlers::list_transport))
                    .route("/transport", web::post().to(handlers::add_transport))
                    .route("/transport", web::delete().to(handlers::reset_transport))
                    .route("/inputs", web::put().to(handlers::update_inputs))
                    .route("/footprint", web::get().to(handlers::footprint))
                    .route("/points", web::get().to(handlers::points))
                    .route("/points", web::post().to(handlers::add_point))
                    .route("/points", web::delete().to(handlers::reset_points))
                    .route("/distance", web::get().to(handlers::points))
                    .route("/tips", web::post().to(handlers::tips))
                    .route("/chat", web::get().to(handlers::chat_history))
                    .route("/chat", web::post().to(handlers::chat))
                    .route("/chat", web::delete().to(handlers::clear_chat)),
            ),
    );
}

/// Starts the carbon tracker API server.
///
/// Loads the coefficient table, selects a chat provider from the
/// environment, and serves until shutdown. Logging must already be
/// initialised by the caller. This is a regular async function; the caller
/// provides the runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the coefficient table is invalid,
/// or if the HTTP server fails to bind or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    log::info!("Loading emission coefficients...");
    let coefficients = EmissionCoefficients::load_from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    log::info!("Configuring AI provider...");
    let provider = carbon_tracker_ai::providers::provider_from_env_or_unconfigured();

    let idle_ttl = std::env::var("SESSION_IDLE_TTL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .map_or(DEFAULT_IDLE_TTL, Duration::from_secs);
    log::info!("Sessions expire after {}s idle", idle_ttl.as_secs());

    let state = web::Data::new(AppState {
        coefficients: Arc::new(coefficients),
        sessions: Arc::new(SessionStore::with_idle_ttl(idle_ttl)),
        tips: TipsAdapter::new(Arc::from(provider)),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
