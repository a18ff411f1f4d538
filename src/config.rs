//! Tracker configuration
//!
//! Every tunable of a run lives here as a named default. Defaults can be
//! overridden through `TICKETWATCH_*` environment variables or CLI flags.

use anyhow::Context;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Result, TrackerError};
use crate::pricing::ConversionRates;

pub const DEFAULT_URL: &str = "https://www.klook.com/activity/2128-disney-resort-shang-hai/";
pub const DEFAULT_CSV_PATH: &str = "data/shanghai_disneyland_prices.csv";
pub const DEFAULT_TIMEZONE: &str = "Australia/Melbourne";
pub const DEFAULT_THRESHOLD_USD: Decimal = Decimal::from_parts(55, 0, 0, false, 0);
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_URL: &str = "TICKETWATCH_URL";
pub const ENV_CSV_PATH: &str = "TICKETWATCH_CSV_PATH";
pub const ENV_TIMEZONE: &str = "TICKETWATCH_TIMEZONE";
pub const ENV_THRESHOLD_USD: &str = "TICKETWATCH_THRESHOLD_USD";

/// Settings for one tracking run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    pub url: String,
    pub csv_path: PathBuf,
    pub timezone: String,
    /// Alert fires when the USD price is strictly below this value
    pub threshold_usd: Decimal,
    pub rates: ConversionRates,
    pub request_timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            timezone: DEFAULT_TIMEZONE.to_string(),
            threshold_usd: DEFAULT_THRESHOLD_USD,
            rates: ConversionRates::default(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl TrackerConfig {
    /// Build a config from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = Self::default();
        if let Some(url) = get(ENV_URL) {
            config.url = url;
        }
        if let Some(path) = get(ENV_CSV_PATH) {
            config.csv_path = PathBuf::from(path);
        }
        if let Some(tz) = get(ENV_TIMEZONE) {
            config.timezone = tz;
        }
        if let Some(raw) = get(ENV_THRESHOLD_USD) {
            config.threshold_usd = parse_threshold(&raw)
                .with_context(|| format!("invalid {}", ENV_THRESHOLD_USD))?;
        }
        Ok(config)
    }
}

/// Parse a threshold such as `55` or `55.0`.
pub fn parse_threshold(raw: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim()).map_err(|e| {
        TrackerError::Config(format!("threshold '{}' is not a number: {}", raw, e)).into()
    })
}
