use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::mapping;
use super::models::{
    CurrentWeatherEnvelope, ForecastEntry, ForecastEnvelope, ProviderErrorEnvelope,
    WeatherReading,
};
use crate::location::LocationQuery;

const CURRENT_ENDPOINT: &str = "weather";
const FORECAST_ENDPOINT: &str = "forecast";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Provider answered with a non-success status
    #[error("Weather provider error: {message}")]
    Status { status: u16, message: String },

    /// Timeout, DNS failure, refused connection or a broken body
    #[error("Weather provider unreachable: {0}")]
    Transport(String),

    #[error("Invalid weather provider response: {0}")]
    Decode(String),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Client for the OpenWeatherMap 2.5 `weather` and `forecast` endpoints
pub struct WeatherGateway {
    client: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl WeatherGateway {
    pub fn new(client: Client, base_url: &str, api_key: &str, language: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            language: language.to_string(),
        }
    }

    pub async fn fetch_current(
        &self,
        query: &LocationQuery,
    ) -> Result<WeatherReading, GatewayError> {
        let envelope: CurrentWeatherEnvelope = self.get_json(CURRENT_ENDPOINT, query).await?;
        Ok(mapping::to_weather_reading(envelope, query))
    }

    pub async fn fetch_raw_forecast(
        &self,
        query: &LocationQuery,
    ) -> Result<Vec<ForecastEntry>, GatewayError> {
        let envelope: ForecastEnvelope = self.get_json(FORECAST_ENDPOINT, query).await?;

        tracing::debug!(
            provider_city = %envelope.city.name,
            provider_country = %envelope.city.country,
            slots = envelope.list.len(),
            "Forecast feed received"
        );

        Ok(mapping::to_forecast_entries(envelope))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &LocationQuery,
    ) -> Result<T, GatewayError> {
        let result = self.send(endpoint, query).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(GatewayError::Status { .. }) => "http_error",
            Err(GatewayError::Transport(_)) => "transport_error",
            Err(GatewayError::Decode(_)) => "decode_error",
        };
        metrics::counter!(
            "weather_gateway_requests_total",
            "endpoint" => endpoint,
            "outcome" => outcome
        )
        .increment(1);

        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
    ) -> Result<T, GatewayError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let q = query.as_provider_query();

        tracing::debug!(endpoint = %endpoint, q = %q, "Calling weather provider");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", q.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint = %endpoint, error = %e, "Weather provider request failed");
                GatewayError::from(e)
            })?;

        let status = response.status();

        if !status.is_success() {
            // A body that fails to read must not hide the status
            let body = response.text().await.unwrap_or_default();
            let err = error_from_response(status, &body);
            tracing::warn!(
                endpoint = %endpoint,
                status = %status,
                error = %err,
                "Weather provider returned an error"
            );
            return Err(err);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

/// Build the error for a non-success response.
///
/// The provider's message, when the body carries one, is appended to the
/// status line. A body that does not parse still reports the status.
pub fn error_from_response(status: StatusCode, body: &str) -> GatewayError {
    let mut message = match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    };

    if let Ok(envelope) = serde_json::from_str::<ProviderErrorEnvelope>(body) {
        if let Some(detail) = envelope.message.filter(|m| !m.trim().is_empty()) {
            message.push_str(": ");
            message.push_str(detail.trim());
        }
        if let Some(cod) = envelope.cod {
            tracing::trace!(cod = %cod, "Provider error code");
        }
    }

    GatewayError::Status {
        status: status.as_u16(),
        message,
    }
}
