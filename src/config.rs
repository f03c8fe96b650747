use crate::utils::AppError;
use std::env;
use std::time::Duration;

/// Process-wide settings read once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub payment_secret_key: String,
    pub payment_api_base: String,
    pub upstream_timeout: Duration,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Configuration(format!("{} must be set", key)))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| AppError::Configuration(format!("PORT is not a valid port: {}", raw)))?,
            None => 5000,
        };

        let timeout_secs = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::Configuration(format!("UPSTREAM_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            None => 10,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            database_url: required("DATABASE_URL")?,
            database_name: lookup("DATABASE_NAME").unwrap_or_else(|| "restaurantDB".to_string()),
            jwt_secret: required("ACCESS_TOKEN_SECRET")?,
            payment_secret_key: required("PAYMENT_SECRET_KEY")?,
            payment_api_base: lookup("PAYMENT_API_BASE")
                .unwrap_or_else(|| "https://api.stripe.com".to_string()),
            upstream_timeout: Duration::from_secs(timeout_secs),
            cors_origins,
        })
    }
}
