use axum::{
    extract::State,
    middleware,
    routing::{delete, get},
    Router,
};

use crate::favorites::handlers as favorites_handlers;
use crate::middleware::require_user;
use crate::openapi::swagger_ui;
use crate::weather::handlers as weather_handlers;
use crate::AppState;

/// Build the weather API routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/weather/forecast/3days/{city}/{country}",
            get(weather_handlers::get_three_day_forecast),
        )
        .route(
            "/weather/forecast/5days/{city}/{country}",
            get(weather_handlers::get_five_day_forecast),
        )
        .route(
            "/weather/forecast/{city}/{country}",
            get(weather_handlers::get_forecast),
        )
        .route("/weather/{city}/{country}", get(weather_handlers::get_weather))
}

/// Build the favorites API routes (bearer token required)
fn favorites_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/favorites",
            get(favorites_handlers::list_favorites).post(favorites_handlers::add_favorite),
        )
        .route(
            "/favorites/{id}",
            delete(favorites_handlers::delete_favorite),
        )
        .route_layer(middleware::from_fn_with_state(state, require_user))
}

/// Build all API v1 routes
pub fn api_v1_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(weather_routes())
        .merge(favorites_routes(state))
}

/// GET /metrics - Prometheus text exposition
async fn render_metrics(State(state): State<AppState>) -> String {
    state.metrics_handle.render()
}

/// Build the complete application router
pub fn build_router(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check at root level
        .route("/", get(weather_handlers::health))
        .route("/health", get(weather_handlers::health))
        .route("/metrics", get(render_metrics))
        // API v1 routes
        .nest("/api/v1", api_v1_routes(state))
        // Swagger UI for API documentation
        .merge(swagger_ui())
}
