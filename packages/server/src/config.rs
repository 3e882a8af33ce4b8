use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub expo_access_token: Option<String>,
    pub mail_sender: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            expo_access_token: env::var("EXPO_ACCESS_TOKEN").ok(),
            mail_sender: env::var("MAIL_SENDER")
                .unwrap_or_else(|_| "noreply@quartier.example".to_string()),
        })
    }
}
