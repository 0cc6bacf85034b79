#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the climate grid data engine.
//!
//! Thin marshalling over the engine crates: the query endpoint feeds the
//! fallback resolver, the overlay endpoint reads the grid store, and the
//! import endpoint drives the ingestion pipeline synchronously. All
//! state is constructed here and injected; there are no module-level
//! singletons.

pub mod cache;
mod handlers;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use chrono::Duration;
use climate_grid_database::db;
use climate_grid_database_models::GridStats;
use climate_grid_risk::RiskResolver;
use climate_grid_source::ClimateProvider;
use climate_grid_source::open_meteo::OpenMeteoClient;
use switchy_database::Database;

use crate::cache::{SystemClock, TimedCache};

/// How long grid statistics stay cached.
const STATS_CACHE_TTL_SECONDS: i64 = 60;

/// Shared application state.
pub struct AppState {
    /// Grid store connection.
    pub db: Arc<dyn Database>,
    /// Upstream archive client, shared with the resolver.
    pub provider: Arc<dyn ClimateProvider>,
    /// The stored → live → synthetic cascade.
    pub resolver: RiskResolver,
    /// Short-TTL cache over the stats scan.
    pub stats_cache: TimedCache<GridStats>,
}

/// Starts the climate grid API server.
///
/// Opens (or creates) the grid database, builds the upstream client and
/// resolver, and binds the Actix-Web server. This is a regular async
/// function; the caller provides the runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if the grid database cannot be opened or the HTTP client
/// cannot be built.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let db_path = std::env::var("CLIMATE_GRID_DB")
        .unwrap_or_else(|_| db::DEFAULT_DB_PATH.to_string());

    log::info!("Opening grid database at {db_path}...");
    let db_conn: Arc<dyn Database> = Arc::from(
        db::open_db(Path::new(&db_path))
            .await
            .expect("Failed to open grid database"),
    );

    let provider: Arc<dyn ClimateProvider> =
        Arc::new(OpenMeteoClient::new().expect("Failed to build archive client"));

    let state = web::Data::new(AppState {
        db: Arc::clone(&db_conn),
        provider: Arc::clone(&provider),
        resolver: RiskResolver::new(db_conn, provider),
        stats_cache: TimedCache::new(
            Duration::seconds(STATS_CACHE_TTL_SECONDS),
            Arc::new(SystemClock),
        ),
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
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/indicators", web::get().to(handlers::indicators))
                    .route("/scenarios", web::get().to(handlers::scenarios))
                    .route("/time-periods", web::get().to(handlers::time_periods))
                    .route(
                        "/physical-risk/query",
                        web::post().to(handlers::physical_risk_query),
                    )
                    .route(
                        "/physical-risk/overlay",
                        web::post().to(handlers::physical_risk_overlay),
                    )
                    .route(
                        "/climate-data/import",
                        web::post().to(handlers::climate_data_import),
                    )
                    .route(
                        "/climate-data/stats",
                        web::get().to(handlers::climate_data_stats),
                    ),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
