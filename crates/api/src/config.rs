//! Application configuration loaded from environment variables.

use std::time::Duration;

use marketplace::RetryPolicy;

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `MARKETPLACE_A_URL` — Marketplace A base URL (default: `"http://localhost:3001"`)
/// - `MARKETPLACE_B_URL` — Marketplace B base URL (default: `"http://localhost:3002"`)
/// - `MARKETPLACE_B_MAX_RETRIES` — retries after the first Marketplace B attempt (default: `3`)
/// - `MARKETPLACE_B_RETRY_DELAY_MS` — pause between Marketplace B attempts (default: `2000`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub marketplace_a_url: String,
    pub marketplace_b_url: String,
    pub marketplace_b_max_retries: u32,
    pub marketplace_b_retry_delay: Duration,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            marketplace_a_url: std::env::var("MARKETPLACE_A_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            marketplace_b_url: std::env::var("MARKETPLACE_B_URL")
                .unwrap_or_else(|_| "http://localhost:3002".to_string()),
            marketplace_b_max_retries: std::env::var("MARKETPLACE_B_MAX_RETRIES")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(3),
            marketplace_b_retry_delay: std::env::var("MARKETPLACE_B_RETRY_DELAY_MS")
                .ok()
                .and_then(|ms| ms.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or_else(|| Duration::from_secs(2)),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the retry policy for Marketplace B calls.
    pub fn marketplace_b_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.marketplace_b_max_retries, self.marketplace_b_retry_delay)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            marketplace_a_url: "http://localhost:3001".to_string(),
            marketplace_b_url: "http://localhost:3002".to_string(),
            marketplace_b_max_retries: 3,
            marketplace_b_retry_delay: Duration::from_secs(2),
        }
    }
}
