use std::{env, fmt::Display, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::errors::AppError;

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,
    pub summary_timeout: Duration,
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        if openai_api_key.is_none() {
            warn!("OPENAI_API_KEY not set, review summaries are disabled");
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            openai_api_key,
            openai_api_url: env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            summary_timeout: Duration::from_secs(try_load("SUMMARY_TIMEOUT_SECS", 20)?),
            port: try_load("PORT", 3001)?,
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key).map_err(|_| AppError::EnvError(format!("{key} must be set")))
}

fn try_load<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| AppError::EnvError(format!("Invalid {key} value: {e}"))),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
