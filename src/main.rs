mod cache;
mod config;
mod db;
mod error;
mod extractors;
mod favorites;
mod location;
mod middleware;
mod openapi;
mod routes;
mod seed;
mod weather;

use axum::{error_handling::HandleErrorLayer, http::StatusCode, BoxError};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cache::{create_forecast_cache, start_cache_cleanup_task};
use crate::config::AppConfig;
use crate::db::{
    create_pool, run_migrations, DbConfig, SqliteFavoriteStore, SqliteUserRepository,
    UserRepository,
};
use crate::favorites::{FavoritesService, RoleAuthorizer};
use crate::weather::{WeatherGateway, WeatherService};

/// Shared HTTP client configuration
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;
const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Whole-request budget for inbound requests
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct AppState {
    pub weather_service: Arc<WeatherService>,
    pub favorites_service: Arc<FavoritesService>,
    pub users: Arc<dyn UserRepository>,
    pub metrics_handle: PrometheusHandle,
}

/// Create shared HTTP client with connection pooling
fn create_http_client(request_timeout_secs: u64) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(request_timeout_secs))
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .pool_idle_timeout(Duration::from_secs(HTTP_POOL_IDLE_TIMEOUT_SECS))
        .pool_max_idle_per_host(10)
        .build()
}

/// Handle request timeout errors
async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {}", err),
        )
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weatherfav=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    tracing::info!("Configuration loaded successfully");

    let metrics_handle = PrometheusBuilder::new().install_recorder()?;

    // Database
    let pool = create_pool(&DbConfig {
        url: config.database_url.clone(),
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;
    tracing::info!(url = %config.database_url, "Database ready");

    let users: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(pool.clone()));
    let favorite_store = Arc::new(SqliteFavoriteStore::new(pool));

    if config.seed.enabled {
        let report =
            seed::seed_demo_data(&config.seed, users.as_ref(), favorite_store.as_ref()).await?;
        tracing::info!(
            created_user = report.created_user,
            created_favorite = report.created_favorite,
            token_generated = report.generated_token.is_some(),
            "Demo data seeded"
        );
    }

    // Weather
    let http_client = create_http_client(config.request_timeout_secs)?;
    let gateway = WeatherGateway::new(
        http_client,
        &config.openweathermap_base_url,
        &config.openweathermap_api_key,
        &config.language,
    );

    let forecast_cache = create_forecast_cache(config.forecast_cache_ttl_secs);
    match &forecast_cache {
        Some(cache) => {
            start_cache_cleanup_task(Arc::clone(cache));
            tracing::info!(
                ttl_secs = config.forecast_cache_ttl_secs,
                "Forecast cache enabled"
            );
        }
        None => tracing::info!("Forecast cache disabled"),
    }

    let weather_service = Arc::new(WeatherService::new(gateway, forecast_cache));

    // Favorites
    let authorizer = Arc::new(RoleAuthorizer::new(
        Arc::clone(&users),
        config.favorite_writer_roles.clone(),
    ));
    let favorites_service = Arc::new(FavoritesService::new(favorite_store, authorizer));

    let state = AppState {
        weather_service,
        favorites_service,
        users,
        metrics_handle,
    };

    let app = routes::build_router(state.clone())
        .layer(
            ServiceBuilder::new()
                // Handle timeout errors
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
