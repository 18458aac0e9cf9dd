use crate::{
    Config, WeatherError,
    model::{Forecast, ForecastQuery, ForecastResult},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of weather data. Each call performs its HTTP work exactly once.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for the query's location.
    async fn current(&self, query: &ForecastQuery) -> Result<ForecastResult, WeatherError>;

    /// Multi-step forecast for the query's location.
    async fn forecast(&self, query: &ForecastQuery) -> Result<Forecast, WeatherError>;
}

/// Construct the provider from resolved config.
pub fn provider_from_config(config: Config) -> Result<Box<dyn WeatherProvider>, WeatherError> {
    Ok(Box::new(OpenWeatherProvider::new(config)?))
}
