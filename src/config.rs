//! Environment-variable based configuration

use std::env;

/// Server settings
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
}

impl Config {
    /// Loads settings from the environment (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            cors_origins: vec!["*".to_string()],
            log_level: "debug".to_string(),
        }
    }
}
