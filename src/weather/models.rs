use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

// ============================================================================
// OpenWeatherMap 2.5 Responses (Internal)
// Every nested object is optional on the wire; missing or null parts default to 0 / ""
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CurrentWeatherEnvelope {
    pub name: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub main: MainInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub weather: Vec<WeatherCondition>,
    #[serde(deserialize_with = "null_as_default")]
    pub wind: WindInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub sys: SysInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MainInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub temp: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub feels_like: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub temp_min: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub temp_max: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub humidity: f64,
}

#[derive(Debug, Default, Deserialize, Clone)]
#[serde(default)]
pub struct WeatherCondition {
    #[serde(deserialize_with = "null_as_default")]
    pub main: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WindInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub speed: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SysInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub sunrise: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub sunset: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastEnvelope {
    #[serde(deserialize_with = "null_as_default")]
    pub list: Vec<ForecastSlot>,
    #[serde(deserialize_with = "null_as_default")]
    pub city: ForecastCity,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastSlot {
    #[serde(deserialize_with = "null_as_default")]
    pub dt: i64,
    pub dt_txt: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub main: MainInfo,
    #[serde(deserialize_with = "null_as_default")]
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastCity {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub country: String,
}

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error body OpenWeatherMap sends with non-2xx responses.
/// `cod` is a number on some endpoints and a string on others.
#[derive(Debug, Deserialize)]
pub struct ProviderErrorEnvelope {
    #[serde(default)]
    pub cod: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

// ============================================================================
// Domain Models
// ============================================================================

/// Point-in-time weather snapshot for one location
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct WeatherReading {
    pub city: String,
    pub country: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_ms: f64,
    pub sunrise_unix: i64,
    pub sunset_unix: i64,
    pub summary: String,
    pub description: String,
    pub icon: String,
}

/// One 3-hour slot of the raw forecast feed
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp_unix: i64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub description: String,
    pub icon: String,
}

/// Summary of one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub description: String,
    pub icon: String,
}
