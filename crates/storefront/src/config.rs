//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `HERO_PRODUCT_ID` - Product promoted on the home page (default: titan-gaming-laptop)
//! - `CHAT_REPLY_MIN_MS` - Shortest support reply delay (default: 1000)
//! - `CHAT_REPLY_MAX_MS` - Longest support reply delay, exclusive (default: 3000)
//! - `CHAT_RNG_SEED` - Seed for reply selection; random when unset
//! - `PURCHASE_DELAY_MS` - Simulated checkout processing time (default: 2000)
//! - `SESSION_IDLE_TIMEOUT_SECS` - Idle time before chat sessions and purchase
//!   dialogs are discarded (default: 1800)
//! - `LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use delta_gear_core::DEFAULT_HERO_PRODUCT_ID;

use crate::services::{ChatSettings, PurchaseSettings, ReplyPicker};

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Id of the hero product; must exist in the catalog
    pub hero_product_id: String,
    /// Live chat simulation settings
    pub chat: ChatConfig,
    /// Checkout processing delay
    pub purchase_delay: Duration,
    /// Idle time after which chat sessions and purchase dialogs are dropped
    pub session_idle_timeout: Duration,
    /// Emit logs as JSON lines instead of text
    pub json_logs: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Live chat simulation configuration.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Shortest reply delay (inclusive)
    pub reply_delay_min: Duration,
    /// Longest reply delay (exclusive)
    pub reply_delay_max: Duration,
    /// Fixed RNG seed for reproducible replies
    pub rng_seed: Option<u64>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            hero_product_id: DEFAULT_HERO_PRODUCT_ID.to_string(),
            chat: ChatConfig::default(),
            purchase_delay: Duration::from_millis(2000),
            session_idle_timeout: Duration::from_secs(1800),
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_min: Duration::from_millis(1000),
            reply_delay_max: Duration::from_millis(3000),
            rng_seed: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env.parse_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = env.parse_or("STOREFRONT_PORT", 3000_u16)?;
        let hero_product_id = env
            .get("HERO_PRODUCT_ID")
            .unwrap_or_else(|| DEFAULT_HERO_PRODUCT_ID.to_string());

        let reply_delay_min = Duration::from_millis(env.parse_or("CHAT_REPLY_MIN_MS", 1000_u64)?);
        let reply_delay_max = Duration::from_millis(env.parse_or("CHAT_REPLY_MAX_MS", 3000_u64)?);
        if reply_delay_max <= reply_delay_min {
            return Err(ConfigError::InvalidEnvVar(
                "CHAT_REPLY_MAX_MS".to_string(),
                "must be greater than CHAT_REPLY_MIN_MS".to_string(),
            ));
        }
        let rng_seed = env.parse_optional::<u64>("CHAT_RNG_SEED")?;

        let purchase_delay = Duration::from_millis(env.parse_or("PURCHASE_DELAY_MS", 2000_u64)?);
        let session_idle_timeout =
            Duration::from_secs(env.parse_or("SESSION_IDLE_TIMEOUT_SECS", 1800_u64)?);
        if session_idle_timeout.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "SESSION_IDLE_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let json_logs = match env.get("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected `text` or `json` (got {other})"),
                ));
            }
        };

        let sentry_sample_rate = validate_rate(
            "SENTRY_SAMPLE_RATE",
            env.parse_or("SENTRY_SAMPLE_RATE", 1.0_f32)?,
        )?;
        let sentry_traces_sample_rate = validate_rate(
            "SENTRY_TRACES_SAMPLE_RATE",
            env.parse_or("SENTRY_TRACES_SAMPLE_RATE", 0.0_f32)?,
        )?;

        Ok(Self {
            host,
            port,
            hero_product_id,
            chat: ChatConfig {
                reply_delay_min,
                reply_delay_max,
                rng_seed,
            },
            purchase_delay,
            session_idle_timeout,
            json_logs,
            sentry_dsn: env.get("SENTRY_DSN"),
            sentry_environment: env.get("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Chat settings with the stock greeting and replies.
    #[must_use]
    pub fn chat_settings(&self) -> ChatSettings {
        ChatSettings {
            reply_delay_min: self.chat.reply_delay_min,
            reply_delay_max: self.chat.reply_delay_max,
            ..ChatSettings::default()
        }
    }

    /// Reply picker, seeded when `CHAT_RNG_SEED` is set.
    #[must_use]
    pub fn reply_picker(&self) -> ReplyPicker {
        self.chat
            .rng_seed
            .map_or_else(ReplyPicker::from_entropy, ReplyPicker::seeded)
    }

    /// Checkout settings.
    #[must_use]
    pub const fn purchase_settings(&self) -> PurchaseSettings {
        PurchaseSettings {
            processing_delay: self.purchase_delay,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup wrapper.
struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Get an optional variable, treating blank values as unset.
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Parse an optional variable.
    fn parse_optional<T>(&self, key: &str) -> Result<Option<T>, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.get(key)
            .map(|value| {
                value
                    .trim()
                    .parse::<T>()
                    .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
            })
            .transpose()
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        Ok(self.parse_optional(key)?.unwrap_or(default))
    }
}

/// Validate that a sample rate lies in `[0, 1]`.
fn validate_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}
