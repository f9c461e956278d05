pub mod aggregate;
pub mod gateway;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod service;

pub use gateway::WeatherGateway;
pub use models::{DailyForecast, ForecastEntry, WeatherReading};
pub use service::WeatherService;
