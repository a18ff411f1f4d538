use lettre::message::{header::ContentType, Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use tracing::info;

use super::{AlertConfig, Notifier};
use crate::error::{Result, TrackerError};

/// Sends alerts as plain-text email through an SMTP relay.
///
/// The connection uses implicit TLS (SMTPS) and authenticates with the
/// configured credentials. Nothing is retried.
pub struct EmailNotifier {
    mailer: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    pub fn new(config: &AlertConfig) -> Result<Self> {
        let from: Mailbox = config.sender.parse().map_err(|e| {
            TrackerError::Config(format!("invalid sender address '{}': {}", config.sender, e))
        })?;
        let to: Mailbox = config.recipient.parse().map_err(|e| {
            TrackerError::Config(format!(
                "invalid recipient address '{}': {}",
                config.recipient, e
            ))
        })?;

        let creds = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = SmtpTransport::relay(&config.host)
            .map_err(|e| TrackerError::Mail(format!("invalid SMTP host '{}': {}", config.host, e)))?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self { mailer, from, to })
    }
}

impl Notifier for EmailNotifier {
    fn notify(&self, subject: &str, body: &str) -> Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| TrackerError::Mail(format!("failed to build email: {}", e)))?;

        self.mailer
            .send(&email)
            .map_err(|e| TrackerError::Mail(format!("SMTP error: {}", e)))?;

        info!("Alert email sent to {}", self.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AlertConfig {
        AlertConfig {
            host: "smtp.example.com".to_string(),
            port: 465,
            username: "tracker@example.com".to_string(),
            password: "secret".to_string(),
            recipient: "me@example.com".to_string(),
            sender: "tracker@example.com".to_string(),
        }
    }

    #[test]
    fn test_builds_notifier_without_connecting() {
        assert!(EmailNotifier::new(&config()).is_ok());
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let mut config = config();
        config.recipient = "not an address".to_string();
        let err = EmailNotifier::new(&config).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::Config(_))
        ));
    }
}
