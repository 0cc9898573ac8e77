use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            base_url: std::env::var("TASKORA_API_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),

            timeout: Duration::from_secs(
                std::env::var("TASKORA_API_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
                    .parse()
                    .context("Invalid TASKORA_API_TIMEOUT_SECS")?,
            ),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
