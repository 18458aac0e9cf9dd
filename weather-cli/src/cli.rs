use std::{
    collections::HashMap,
    io::{self, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use tracing::info;
use weather_core::{
    Config, FileConfig, ForecastQuery, Units, WeatherError, config::process_env,
    model::DEFAULT_COUNTRY, present, provider_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Get the current weather for a city")]
pub struct Cli {
    /// City to get the weather for; quote names with spaces, e.g. "New York".
    pub city: String,

    /// Two-letter country code of the city.
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    pub country: String,

    /// Unit system: standard, metric or imperial. Overrides WEATHER_UNITS.
    #[arg(long)]
    pub units: Option<Units>,

    /// Show the 5-day / 3-hour forecast instead of current conditions.
    #[arg(long)]
    pub forecast: bool,

    /// .env file holding OPENWEATHER_API_KEY.
    #[arg(long, default_value = ".env")]
    pub env_file: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub async fn run(self) -> Result<(), WeatherError> {
        let env = process_env();
        let config_file = FileConfig::default_path();
        let mut stdout = io::stdout().lock();

        self.run_with(&env, config_file.as_deref(), &mut stdout).await
    }

    /// Query -> config -> one lookup -> render into `out`.
    ///
    /// Nothing is written to `out` unless the lookup succeeded.
    pub async fn run_with<W: Write>(
        &self,
        env: &HashMap<String, String>,
        config_file: Option<&Path>,
        out: &mut W,
    ) -> Result<(), WeatherError> {
        let query = ForecastQuery::new(&self.city, Some(&self.country))?;

        let mut config = Config::load(env, &self.env_file, config_file)?;
        if let Some(units) = self.units {
            config.units = units;
        }
        info!(location = %query.location(), units = %config.units, forecast = self.forecast, "looking up weather");

        let provider = provider_from_config(config)?;

        if self.forecast {
            let forecast = provider.forecast(&query).await?;
            present::render_forecast(&query, &forecast, out)?;
        } else {
            let current = provider.current(&query).await?;
            present::render_current(&query, &current, out)?;
        }

        Ok(())
    }
}
