use axum::http::StatusCode;
use thiserror::Error;

use super::aggregate::aggregate;
use super::gateway::{GatewayError, WeatherGateway};
use super::models::{DailyForecast, ForecastEntry, WeatherReading};
use crate::cache::ForecastCache;
use crate::error::HttpError;
use crate::impl_into_response;
use crate::location::{LocationQuery, ValidationError};

/// Days a forecast request may ask for; the provider feed spans 5 days
pub const MAX_FORECAST_DAYS: u32 = 5;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("No weather data found for {0}")]
    NoData(String),
}

impl HttpError for WeatherError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Gateway(e) if e.status() == Some(404) => StatusCode::NOT_FOUND,
            Self::Gateway(_) => StatusCode::BAD_GATEWAY,
            Self::NoData(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Validation(_) => Some("VALIDATION_ERROR"),
            Self::Gateway(GatewayError::Status { status: 404, .. }) => Some("CITY_NOT_FOUND"),
            Self::Gateway(GatewayError::Status { .. }) => Some("UPSTREAM_ERROR"),
            Self::Gateway(GatewayError::Transport(_)) => Some("UPSTREAM_UNAVAILABLE"),
            Self::Gateway(GatewayError::Decode(_)) => Some("INVALID_UPSTREAM_RESPONSE"),
            Self::NoData(_) => Some("NO_WEATHER_DATA"),
        }
    }
}

impl_into_response!(WeatherError);

/// Current weather and N-day forecasts for a city/country pair
pub struct WeatherService {
    gateway: WeatherGateway,
    forecast_cache: Option<ForecastCache>,
}

impl WeatherService {
    pub fn new(gateway: WeatherGateway, forecast_cache: Option<ForecastCache>) -> Self {
        Self {
            gateway,
            forecast_cache,
        }
    }

    pub async fn get_current_weather(
        &self,
        city: &str,
        country: &str,
    ) -> Result<WeatherReading, WeatherError> {
        let query = LocationQuery::normalize(city, country)?;

        tracing::info!(
            city = %query.city(),
            country = %query.country_code(),
            "Fetching current weather"
        );

        let reading = self.gateway.fetch_current(&query).await?;

        tracing::info!(city = %reading.city, temp = %reading.temp_c, "Current weather fetched");

        Ok(reading)
    }

    /// Daily summaries for the next `days` days (1..=5)
    pub async fn get_forecast(
        &self,
        city: &str,
        country: &str,
        days: u32,
    ) -> Result<Vec<DailyForecast>, WeatherError> {
        if !(1..=MAX_FORECAST_DAYS).contains(&days) {
            return Err(ValidationError::new(format!(
                "days must be between 1 and {}",
                MAX_FORECAST_DAYS
            ))
            .into());
        }

        let query = LocationQuery::normalize(city, country)?;

        tracing::info!(
            city = %query.city(),
            country = %query.country_code(),
            days = days,
            "Fetching forecast"
        );

        let entries = self.raw_forecast(&query).await?;
        let daily = aggregate(&entries, days as usize);

        if daily.is_empty() {
            return Err(WeatherError::NoData(query.as_provider_query()));
        }

        Ok(daily)
    }

    async fn raw_forecast(
        &self,
        query: &LocationQuery,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let Some(cache) = &self.forecast_cache else {
            return Ok(self.gateway.fetch_raw_forecast(query).await?);
        };

        let key = query.cache_key();
        if let Some(entries) = cache.get(&key) {
            tracing::debug!(key = %key, "Forecast cache hit");
            return Ok(entries);
        }

        tracing::debug!(key = %key, "Forecast cache miss");
        let entries = self.gateway.fetch_raw_forecast(query).await?;
        cache.insert(key, entries.clone());

        Ok(entries)
    }
}
