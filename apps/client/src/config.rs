use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::store::outbox::RetryPolicy;

const DEFAULT_API_URL: &str = "http://localhost/hirerig/api";
const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client configuration loaded from environment variables.
/// Only the generative-text key is optional; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub gemini_api_url: String,
    pub gemini_api_key: Option<String>,
    pub data_dir: PathBuf,
    pub http_timeout: Duration,
    pub outbox_max_attempts: u32,
    pub outbox_base_delay: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            api_base_url: env_or("HIRERIG_API_URL", DEFAULT_API_URL),
            gemini_api_url: env_or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            data_dir: PathBuf::from(env_or("HIRERIG_DATA_DIR", ".hirerig")),
            http_timeout: Duration::from_secs(
                env_or("HTTP_TIMEOUT_SECS", "30")
                    .parse::<u64>()
                    .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            outbox_max_attempts: env_or("OUTBOX_MAX_ATTEMPTS", "3")
                .parse::<u32>()
                .context("OUTBOX_MAX_ATTEMPTS must be a positive integer")?,
            outbox_base_delay: Duration::from_millis(
                env_or("OUTBOX_BASE_DELAY_MS", "1000")
                    .parse::<u64>()
                    .context("OUTBOX_BASE_DELAY_MS must be a whole number of milliseconds")?,
            ),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.outbox_max_attempts.max(1),
            base_delay: self.outbox_base_delay,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_never_has_zero_attempts() {
        let config = Config {
            api_base_url: DEFAULT_API_URL.to_string(),
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            gemini_api_key: None,
            data_dir: PathBuf::from(".hirerig"),
            http_timeout: Duration::from_secs(30),
            outbox_max_attempts: 0,
            outbox_base_delay: Duration::from_millis(10),
            rust_log: "info".to_string(),
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay, Duration::from_millis(10));
    }
}
