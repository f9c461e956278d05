use chrono::NaiveDateTime;

use super::models::{
    CurrentWeatherEnvelope, ForecastEntry, ForecastEnvelope, ForecastSlot, WeatherReading,
};
use crate::location::LocationQuery;

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Map the current-weather envelope to a reading.
///
/// The provider's own city name wins over the queried one; the country is
/// always the normalized query country.
pub fn to_weather_reading(
    envelope: CurrentWeatherEnvelope,
    query: &LocationQuery,
) -> WeatherReading {
    let condition = envelope.weather.into_iter().next().unwrap_or_default();

    WeatherReading {
        city: envelope
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| query.city().to_string()),
        country: query.country_code().to_string(),
        temp_c: envelope.main.temp,
        feels_like_c: envelope.main.feels_like,
        temp_min_c: envelope.main.temp_min,
        temp_max_c: envelope.main.temp_max,
        humidity_pct: envelope.main.humidity,
        wind_speed_ms: envelope.wind.speed,
        sunrise_unix: envelope.sys.sunrise,
        sunset_unix: envelope.sys.sunset,
        summary: condition.main,
        description: condition.description,
        icon: condition.icon,
    }
}

/// Flatten the forecast envelope into raw entries, keeping provider order
pub fn to_forecast_entries(envelope: ForecastEnvelope) -> Vec<ForecastEntry> {
    envelope.list.into_iter().map(to_forecast_entry).collect()
}

fn to_forecast_entry(slot: ForecastSlot) -> ForecastEntry {
    let condition = slot.weather.into_iter().next().unwrap_or_default();

    ForecastEntry {
        timestamp_unix: slot_timestamp(slot.dt, slot.dt_txt.as_deref()),
        temp_min_c: slot.main.temp_min,
        temp_max_c: slot.main.temp_max,
        description: condition.description,
        icon: condition.icon,
    }
}

/// `dt_txt` is the UTC slot time as text. Prefer it and fall back to `dt`.
fn slot_timestamp(dt: i64, dt_txt: Option<&str>) -> i64 {
    dt_txt
        .and_then(|txt| NaiveDateTime::parse_from_str(txt.trim(), DT_TXT_FORMAT).ok())
        .map(|naive| naive.and_utc().timestamp())
        .unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::models::{MainInfo, WeatherCondition};

    fn query() -> LocationQuery {
        LocationQuery::normalize("Berlin", "de").unwrap()
    }

    #[test]
    fn test_reading_from_envelope_with_missing_parts() {
        let envelope: CurrentWeatherEnvelope =
            serde_json::from_str(r#"{"main":{"temp":12.5,"humidity":80}}"#).unwrap();

        let reading = to_weather_reading(envelope, &query());

        assert_eq!(reading.city, "Berlin");
        assert_eq!(reading.country, "DE");
        assert_eq!(reading.temp_c, 12.5);
        assert_eq!(reading.humidity_pct, 80.0);
        assert_eq!(reading.wind_speed_ms, 0.0);
        assert_eq!(reading.sunrise_unix, 0);
        assert_eq!(reading.sunset_unix, 0);
        assert_eq!(reading.summary, "");
        assert_eq!(reading.description, "");
        assert_eq!(reading.icon, "");
    }

    #[test]
    fn test_reading_prefers_provider_city_name() {
        let envelope = CurrentWeatherEnvelope {
            name: Some("Berlin Mitte".to_string()),
            weather: vec![WeatherCondition {
                main: "Clouds".to_string(),
                description: "überwiegend bewölkt".to_string(),
                icon: "04d".to_string(),
            }],
            ..Default::default()
        };

        let reading = to_weather_reading(envelope, &query());

        assert_eq!(reading.city, "Berlin Mitte");
        assert_eq!(reading.summary, "Clouds");
        assert_eq!(reading.description, "überwiegend bewölkt");
        assert_eq!(reading.icon, "04d");
    }

    #[test]
    fn test_blank_provider_city_falls_back_to_query() {
        let envelope = CurrentWeatherEnvelope {
            name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(to_weather_reading(envelope, &query()).city, "Berlin");
    }

    #[test]
    fn test_forecast_entries_keep_order_and_use_dt_txt() {
        let envelope: ForecastEnvelope = serde_json::from_str(
            r#"{
                "list": [
                    {"dt": 1, "dt_txt": "2024-05-01 12:00:00",
                     "main": {"temp_min": 12.0, "temp_max": 18.0},
                     "weather": [{"main": "Clouds", "description": "clouds", "icon": "03d"}]},
                    {"dt": 1714521600, "main": {"temp_min": 10.0, "temp_max": 15.0}}
                ],
                "city": {"name": "Berlin", "country": "DE"}
            }"#,
        )
        .unwrap();

        let entries = to_forecast_entries(envelope);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].timestamp_unix, 1714564800);
        assert_eq!(entries[0].description, "clouds");
        assert_eq!(entries[0].icon, "03d");
        assert_eq!(entries[1].timestamp_unix, 1714521600);
        assert_eq!(entries[1].description, "");
    }

    #[test]
    fn test_unparseable_dt_txt_falls_back_to_dt() {
        let slot = ForecastSlot {
            dt: 42,
            dt_txt: Some("yesterday-ish".to_string()),
            main: MainInfo::default(),
            weather: Vec::new(),
        };
        assert_eq!(to_forecast_entry(slot).timestamp_unix, 42);
    }
}
