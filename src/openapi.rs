use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::error::ErrorResponse;
use crate::favorites::{CreateFavoriteRequest, Favorite};
use crate::weather::{DailyForecast, WeatherReading};

/// OpenAPI documentation for the weatherfav API
///
/// Schema documentation only; paths are listed in the tag descriptions.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "weatherfav API",
        version = "0.1.0",
        description = "Current weather, daily forecasts aggregated from the OpenWeatherMap 3-hour feed, and up to five favorite locations per user.",
    ),
    tags(
        (name = "weather", description = "GET /api/v1/weather/{city}/{country}"),
        (name = "forecast", description = "GET /api/v1/weather/forecast/{3days|5days}/{city}/{country}, GET /api/v1/weather/forecast/{city}/{country}?days=N"),
        (name = "favorites", description = "GET, POST /api/v1/favorites and DELETE /api/v1/favorites/{id}; bearer token required")
    ),
    components(
        schemas(
            ErrorResponse,
            WeatherReading,
            DailyForecast,
            Favorite,
            CreateFavoriteRequest,
        )
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
