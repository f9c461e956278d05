use config::{Case, Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// OpenWeatherMap API key
    pub openweathermap_api_key: String,

    /// Base URL of the OpenWeatherMap 2.5 API
    #[serde(default = "default_base_url")]
    pub openweathermap_base_url: String,

    /// Language for provider descriptions
    #[serde(default = "default_language")]
    pub language: String,

    /// Database URL (SQLite connection string)
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Upper bound for a single provider call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long a raw forecast series is reused; 0 disables the cache
    #[serde(default = "default_forecast_cache_ttl_secs")]
    pub forecast_cache_ttl_secs: u64,

    /// Roles allowed to add favorites
    #[serde(default = "default_writer_roles")]
    pub favorite_writer_roles: Vec<String>,

    /// Demo data created at startup
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SeedConfig {
    /// Whether the demo account is created at startup
    #[serde(default)]
    pub enabled: bool,

    /// Bearer token for the demo account; generated when unset
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_language() -> String {
    "de".to_string()
}

fn default_database_url() -> String {
    "sqlite:data/weatherfav.db".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_forecast_cache_ttl_secs() -> u64 {
    600
}

fn default_writer_roles() -> Vec<String> {
    vec!["superuser".to_string()]
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("language", default_language())?
            // Load from config file if present
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name("config.local").required(false))
            // Override with environment variables (prefixed with WEATHERFAV_)
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    fn environment() -> Environment {
        Environment::with_prefix("WEATHERFAV")
            .prefix_separator("_")
            .separator("__")
            .convert_case(Case::Snake)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("favorite_writer_roles")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_fill_optional_keys() {
        let config = from_toml(r#"openweathermap_api_key = "abc""#).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.language, "de");
        assert_eq!(
            config.openweathermap_base_url,
            "https://api.openweathermap.org/data/2.5"
        );
        assert_eq!(config.forecast_cache_ttl_secs, 600);
        assert_eq!(config.favorite_writer_roles, vec!["superuser"]);
        assert!(!config.seed.enabled);
        assert!(config.seed.api_token.is_none());
    }

    #[test]
    fn test_api_key_is_required() {
        assert!(from_toml(r#"port = 8080"#).is_err());
    }

    #[test]
    fn test_nested_seed_section() {
        let config = from_toml(
            r#"
            openweathermap_api_key = "abc"
            favorite_writer_roles = ["superuser", "user"]

            [seed]
            enabled = true
            api_token = "demo-token"
            "#,
        )
        .unwrap();

        assert!(config.seed.enabled);
        assert_eq!(config.seed.api_token.as_deref(), Some("demo-token"));
        assert_eq!(config.favorite_writer_roles.len(), 2);
    }
}
