//! Configuration loading from environment.

use std::env;

/// Default base URL of the external rate service.
const DEFAULT_RATES_API_URL: &str = "https://api.frankfurter.dev/v1";

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub rates_api_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let rates_api_url =
            env::var("RATES_API_URL").unwrap_or_else(|_| DEFAULT_RATES_API_URL.to_string());

        Ok(Self {
            port,
            database_url,
            rates_api_url,
        })
    }
}
