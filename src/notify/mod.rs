//! Price alerts
//!
//! An alert is a single plain-text email sent when the USD price drops below
//! the configured threshold. Relay settings come from the environment and are
//! optional: without them alerting is disabled and the run carries on.

pub mod email;

use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{Result, TrackerError};
use crate::records::PriceRecord;
use crate::utils::{format_currency, format_optional, CurrencySymbol};

pub use email::EmailNotifier;

pub const ENV_SMTP_SERVER: &str = "SMTP_SERVER";
pub const ENV_SMTP_PORT: &str = "SMTP_PORT";
pub const ENV_SMTP_USER: &str = "SMTP_USER";
pub const ENV_SMTP_PASS: &str = "SMTP_PASS";
pub const ENV_TO_EMAIL: &str = "TO_EMAIL";
pub const ENV_FROM_EMAIL: &str = "FROM_EMAIL";

/// Implicit-TLS submission port
pub const DEFAULT_SMTP_PORT: u16 = 465;

/// Delivery channel for alert messages
pub trait Notifier {
    fn notify(&self, subject: &str, body: &str) -> Result<()>;
}

/// Where an alert goes once one is due.
///
/// The relay settings behind [`AlertChannel::Environment`] are read and
/// validated only when an alert is actually due.
#[derive(Clone, Copy)]
pub enum AlertChannel<'a> {
    /// Alert delivery is not available
    Off,
    /// An already built notifier
    Notifier(&'a dyn Notifier),
    /// Email built from the SMTP_* environment variables
    Environment,
}

impl<'a> AlertChannel<'a> {
    /// Call `send` with the channel's notifier.
    ///
    /// Returns `Ok(None)` when there is nothing to deliver through.
    pub fn with_notifier<T>(
        self,
        send: impl FnOnce(&dyn Notifier) -> Result<T>,
    ) -> Result<Option<T>> {
        match self {
            AlertChannel::Off => Ok(None),
            AlertChannel::Notifier(notifier) => send(notifier).map(Some),
            AlertChannel::Environment => match AlertConfig::from_env()? {
                Some(config) => {
                    let email = EmailNotifier::new(&config)?;
                    send(&email).map(Some)
                }
                None => Ok(None),
            },
        }
    }
}

/// SMTP relay settings
#[derive(Clone, PartialEq, Eq)]
pub struct AlertConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub recipient: String,
    pub sender: String,
}

impl std::fmt::Debug for AlertConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("recipient", &self.recipient)
            .field("sender", &self.sender)
            .finish()
    }
}

impl AlertConfig {
    /// Read relay settings from the process environment.
    ///
    /// Returns `Ok(None)` when a required variable is missing.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = get(ENV_SMTP_SERVER);
        let username = get(ENV_SMTP_USER);
        let password = get(ENV_SMTP_PASS);
        let recipient = get(ENV_TO_EMAIL);

        let missing: Vec<&str> = [
            (ENV_SMTP_SERVER, host.is_none()),
            (ENV_SMTP_USER, username.is_none()),
            (ENV_SMTP_PASS, password.is_none()),
            (ENV_TO_EMAIL, recipient.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        let (Some(host), Some(username), Some(password), Some(recipient)) =
            (host, username, password, recipient)
        else {
            warn!(
                "Email alert disabled: missing environment variables {}",
                missing.join(", ")
            );
            return Ok(None);
        };

        let port = match get(ENV_SMTP_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                TrackerError::Config(format!("{} '{}' is not a valid port: {}", ENV_SMTP_PORT, raw, e))
            })?,
            None => DEFAULT_SMTP_PORT,
        };
        let sender = get(ENV_FROM_EMAIL).unwrap_or_else(|| username.clone());

        Ok(Some(Self {
            host,
            port,
            username,
            password,
            recipient,
            sender,
        }))
    }
}

/// True when the record's USD price is strictly below `threshold`.
pub fn should_alert(record: &PriceRecord, threshold: Decimal) -> bool {
    record.price_usd.is_some_and(|usd| usd < threshold)
}

/// Subject and body of the alert email for `record`.
pub fn compose_alert(record: &PriceRecord, threshold: Decimal) -> (String, String) {
    let usd = format_optional(record.price_usd, CurrencySymbol::Usd);
    let subject = format!("Shanghai Disneyland ticket price alert: {}", usd);
    let body = format!(
        "The Shanghai Disneyland ticket price dropped below {}.\n\n\
         Date: {}\n\
         Price (USD): {}\n\
         Price (CNY): {}\n\
         Price (AUD): {}\n",
        format_currency(threshold, CurrencySymbol::Usd),
        record.date.format("%Y-%m-%d"),
        usd,
        format_optional(record.price_cny, CurrencySymbol::Cny),
        format_optional(record.price_aud, CurrencySymbol::Aud),
    );
    (subject, body)
}
