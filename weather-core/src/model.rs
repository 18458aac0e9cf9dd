use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::WeatherError;

/// Country used when the caller does not pass one.
pub const DEFAULT_COUNTRY: &str = "us";

/// The (city, country) pair driving one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    city: String,
    country: String,
}

impl ForecastQuery {
    /// Build a query; the city is trimmed and must not end up empty.
    ///
    /// The country is forwarded as given (no check against real ISO codes).
    pub fn new(city: &str, country: Option<&str>) -> Result<Self, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::Usage("City name must not be empty.".to_string()));
        }

        let country = country.unwrap_or(DEFAULT_COUNTRY);

        Ok(Self { city: city.to_string(), country: country.to_string() })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// Combined OpenWeather location parameter, e.g. `London,uk`.
    pub fn location(&self) -> String {
        format!("{},{}", self.city, self.country)
    }
}

/// Unit system requested from the API and used for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Standard,
    Metric,
    #[default]
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Standard => "K",
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Standard | Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "standard" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(format!(
                "Unknown units '{value}'. Supported units: standard, metric, imperial."
            )),
        }
    }
}

/// Current conditions as displayed to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub location: Option<String>,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub description: String,
    /// Relative humidity in percent.
    pub humidity: f64,
    pub pressure: Option<u32>,
    pub wind_speed: Option<f64>,
    pub observed_at: Option<DateTime<Utc>>,
    pub units: Units,
}

/// Multi-step forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub city: String,
    pub country: Option<String>,
    pub units: Units,
    pub entries: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub at: DateTime<Utc>,
    pub temperature: f64,
    pub description: String,
    pub humidity: f64,
}
