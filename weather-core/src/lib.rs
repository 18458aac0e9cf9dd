//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credential loading (.env, environment, config file)
//! - The weather provider abstraction and its OpenWeatherMap client
//! - Shared domain models (queries, results) and the error taxonomy
//! - Plain-text presentation of results
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod present;
pub mod provider;

pub use config::{Config, FileConfig};
pub use error::WeatherError;
pub use model::{Forecast, ForecastEntry, ForecastQuery, ForecastResult, Units};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
