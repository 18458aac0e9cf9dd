use thiserror::Error;

/// Everything that can stop a forecast lookup.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Bad or missing command-line input.
    #[error("{0} (usage: weather <CITY> [--country <CODE>])")]
    Usage(String),

    /// No API key in the environment, the .env file or the config file.
    #[error("No OpenWeatherMap API key found; set OPENWEATHER_API_KEY in the environment or in a .env file")]
    MissingCredential,

    /// A configuration value is present but unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// DNS, connect, TLS or timeout failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with an error status or an error `cod`.
    #[error("API error {code}: {message}")]
    Api { code: u16, message: String },

    /// The response body did not have the expected shape.
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl WeatherError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => 2,
            Self::MissingCredential | Self::Config(_) => 3,
            Self::Network(_) => 4,
            Self::Api { .. } => 5,
            Self::Parse(_) => 6,
            Self::Io(_) => 1,
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key in its query string.
        let err = err.without_url();
        if err.is_builder() {
            Self::Config(format!("invalid request ({err}); check {}", crate::config::BASE_URL_VAR))
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else if err.is_timeout() {
            Self::Network(format!("request timed out ({err})"))
        } else {
            Self::Network(err.to_string())
        }
    }
}
