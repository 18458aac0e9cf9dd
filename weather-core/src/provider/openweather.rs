use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    Config, WeatherError,
    model::{Forecast, ForecastEntry, ForecastQuery, ForecastResult, Units},
};

use super::WeatherProvider;

const CURRENT_PATH: &str = "/data/2.5/weather";
const GEOCODE_PATH: &str = "/geo/1.0/direct";
const FORECAST_PATH: &str = "/data/2.5/forecast";

/// Client for the OpenWeatherMap REST API.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    config: Config,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(config: Config) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| WeatherError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, http })
    }

    pub fn units(&self) -> Units {
        self.config.units
    }

    /// GET `path` with `params` plus the API key, returning the raw body of a successful reply.
    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<String, WeatherError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(%url, ?params, "sending request");

        let res = self
            .http
            .get(&url)
            .query(params)
            .query(&[("appid", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, bytes = body.len(), "received response");

        if !status.is_success() {
            return Err(api_error(status, &body));
        }
        check_cod(&body)?;

        Ok(body)
    }

    #[instrument(skip(self, query), fields(location = %query.location()))]
    async fn fetch_current(&self, query: &ForecastQuery) -> Result<ForecastResult, WeatherError> {
        let units = self.units();
        let body = self
            .get(
                CURRENT_PATH,
                &[("q", query.location()), ("units", units.as_str().to_string())],
            )
            .await?;

        let parsed: OwCurrentResponse = parse_body(&body, "current weather")?;

        let description = parsed
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        let location = parsed.name.filter(|n| !n.is_empty()).map(|name| {
            match parsed.sys.and_then(|s| s.country) {
                Some(country) => format!("{name}, {country}"),
                None => name,
            }
        });

        Ok(ForecastResult {
            location,
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            temp_min: parsed.main.temp_min,
            temp_max: parsed.main.temp_max,
            description,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            wind_speed: parsed.wind.map(|w| w.speed),
            observed_at: parsed.dt.and_then(unix_to_utc),
            units,
        })
    }

    /// Resolve the query to coordinates via the geocoding endpoint.
    async fn geocode(&self, query: &ForecastQuery) -> Result<OwGeoLocation, WeatherError> {
        let body = self
            .get(GEOCODE_PATH, &[("q", query.location()), ("limit", "1".to_string())])
            .await?;

        let places: Vec<OwGeoLocation> = parse_body(&body, "geocoding")?;

        places.into_iter().next().ok_or_else(|| WeatherError::Api {
            code: StatusCode::NOT_FOUND.as_u16(),
            message: "city not found".to_string(),
        })
    }

    #[instrument(skip(self, query), fields(location = %query.location()))]
    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<Forecast, WeatherError> {
        let place = self.geocode(query).await?;
        debug!(lat = place.lat, lon = place.lon, "resolved coordinates");

        let units = self.units();
        let body = self
            .get(
                FORECAST_PATH,
                &[
                    ("lat", place.lat.to_string()),
                    ("lon", place.lon.to_string()),
                    ("units", units.as_str().to_string()),
                    ("lang", "en".to_string()),
                ],
            )
            .await?;

        let parsed: OwForecastResponse = parse_body(&body, "forecast")?;

        let entries = parsed
            .list
            .into_iter()
            .map(|entry| -> Result<ForecastEntry, WeatherError> {
                let at = unix_to_utc(entry.dt).ok_or_else(|| {
                    WeatherError::Parse(format!("forecast entry has invalid timestamp {}", entry.dt))
                })?;
                let description = entry
                    .weather
                    .first()
                    .map(|w| w.description.clone())
                    .unwrap_or_else(|| "Unknown".to_string());

                Ok(ForecastEntry {
                    at,
                    temperature: entry.main.temp,
                    description,
                    humidity: entry.main.humidity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Forecast {
            city: place.name,
            country: place.country,
            units,
            entries,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: f64,
    pressure: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    dt: Option<i64>,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: Option<OwWind>,
    sys: Option<OwSys>,
}

#[derive(Debug, Deserialize)]
struct OwGeoLocation {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

/// `cod` is a number on some endpoints and a string on others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCod {
    Number(u16),
    Text(String),
}

impl OwCod {
    fn code(&self) -> Option<u16> {
        match self {
            OwCod::Number(n) => Some(*n),
            OwCod::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Status fields present on most OpenWeather bodies, including error bodies.
#[derive(Debug, Deserialize)]
struct OwStatus {
    cod: Option<OwCod>,
    message: Option<serde_json::Value>,
}

impl OwStatus {
    fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    fn message(&self) -> Option<String> {
        match self.message.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, query: &ForecastQuery) -> Result<ForecastResult, WeatherError> {
        self.fetch_current(query).await
    }

    async fn forecast(&self, query: &ForecastQuery) -> Result<Forecast, WeatherError> {
        self.fetch_forecast(query).await
    }
}

fn api_error(status: StatusCode, body: &str) -> WeatherError {
    let message = OwStatus::from_body(body)
        .and_then(|s| s.message())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| truncate_body(body));

    WeatherError::Api { code: status.as_u16(), message }
}

/// A 2xx reply can still report failure through its `cod` field.
fn check_cod(body: &str) -> Result<(), WeatherError> {
    let Some(status) = OwStatus::from_body(body) else {
        return Ok(());
    };

    match status.cod.as_ref().and_then(OwCod::code) {
        Some(code) if code != 200 => Err(WeatherError::Api {
            code,
            message: status.message().unwrap_or_else(|| "request failed".to_string()),
        }),
        _ => Ok(()),
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &str, what: &str) -> Result<T, WeatherError> {
    serde_json::from_str(body).map_err(|e| WeatherError::Parse(format!("{what}: {e}")))
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
