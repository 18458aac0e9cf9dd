use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, fs, path::Path, path::PathBuf, time::Duration};
use tracing::debug;

use crate::{WeatherError, model::Units};

pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
/// Name used by older `.env` files.
pub const LEGACY_API_KEY_VAR: &str = "API_KEY";
pub const BASE_URL_VAR: &str = "WEATHER_BASE_URL";
pub const TIMEOUT_VAR: &str = "WEATHER_TIMEOUT_SECS";
pub const UNITS_VAR: &str = "WEATHER_UNITS";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Optional settings file in the platform config directory.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// timeout_secs = 5
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub units: Option<Units>,
}

impl FileConfig {
    /// Load the config file, or return an empty default if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, WeatherError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            WeatherError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        toml::from_str(&contents).map_err(|e| {
            WeatherError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Path to the config file, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "weather", "weather-cli")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

/// Read `KEY=VALUE` pairs from a .env file without touching the process environment.
///
/// A missing file yields an empty map.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, WeatherError> {
    if !path.exists() {
        debug!(path = %path.display(), "no .env file");
        return Ok(HashMap::new());
    }

    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| WeatherError::Config(format!("failed to read {}: {e}", path.display())))?;

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.map_err(|e| {
            WeatherError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;
        vars.insert(key, value);
    }

    debug!(path = %path.display(), count = vars.len(), "loaded .env file");
    Ok(vars)
}

/// Snapshot of the process environment; non-UTF-8 entries are skipped.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}

/// Resolved settings handed to the weather client.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub units: Units,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("units", &self.units)
            .finish()
    }
}

impl Config {
    /// Config with the given key and defaults for everything else.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            units: Units::default(),
        }
    }

    /// Load from `process` (the environment), then `env_file`, then `config_file`.
    pub fn load(
        process: &HashMap<String, String>,
        env_file: &Path,
        config_file: Option<&Path>,
    ) -> Result<Self, WeatherError> {
        let dotenv = read_dotenv(env_file)?;
        let file = match config_file {
            Some(path) => FileConfig::load_from(path)?,
            None => FileConfig::default(),
        };

        Self::resolve(process, &dotenv, &file)
    }

    /// Merge the three sources; earlier sources win, but an earlier name in a
    /// lookup list beats a later name in any layer.
    pub fn resolve(
        process: &HashMap<String, String>,
        dotenv: &HashMap<String, String>,
        file: &FileConfig,
    ) -> Result<Self, WeatherError> {
        let layers = [process, dotenv];
        let lookup = |names: &[&str]| -> Option<String> {
            names.iter().find_map(|name| {
                layers.iter().find_map(|layer| non_blank(layer.get(*name).map(String::as_str)))
            })
        };

        let api_key = lookup(&[API_KEY_VAR, LEGACY_API_KEY_VAR])
            .or_else(|| non_blank(file.api_key.as_deref()))
            .ok_or(WeatherError::MissingCredential)?;

        let base_url = lookup(&[BASE_URL_VAR])
            .or_else(|| non_blank(file.base_url.as_deref()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match lookup(&[TIMEOUT_VAR]) {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                WeatherError::Config(format!("{TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"))
            })?,
            None => file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(WeatherError::Config("timeout must be at least 1 second".to_string()));
        }

        let units = match lookup(&[UNITS_VAR]) {
            Some(raw) => raw.parse::<Units>().map_err(WeatherError::Config)?,
            None => file.units.unwrap_or_default(),
        };

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(timeout_secs),
            units,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
