//! SMTP relay delivery (implicit TLS with login)

use std::time::Duration;

use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, info};

use crate::config::SmtpConfig;

use super::email::non_blank;
use super::{DeliveryError, EmailDraft, valid_email};

const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// A fully configured relay
#[derive(Clone)]
pub struct SmtpSender {
    host: String,
    port: u16,
    user: String,
    password: String,
}

impl SmtpSender {
    /// Requires host, port, user and password; otherwise `SmtpNotConfigured`
    pub fn from_config(config: &SmtpConfig) -> Result<Self, DeliveryError> {
        debug!(host = %config.host, port = config.port, "SmtpSender::from_config: called");
        Self::new(&config.host, config.port, &config.user, config.password())
    }

    fn new(host: &str, port: u16, user: &str, password: Option<String>) -> Result<Self, DeliveryError> {
        let (Some(host), Some(user), Some(password)) = (non_blank(host), non_blank(user), password) else {
            return Err(DeliveryError::SmtpNotConfigured);
        };
        if port == 0 || password.is_empty() {
            return Err(DeliveryError::SmtpNotConfigured);
        }
        Ok(Self {
            host: host.to_string(),
            port,
            user: user.to_string(),
            password,
        })
    }

    /// Login user, used as the sender when the draft has none
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Resolve and check the sender and recipient for `draft`
    pub fn envelope(&self, draft: &EmailDraft) -> Result<(String, String), DeliveryError> {
        let from = non_blank(&draft.from).unwrap_or(&self.user).to_string();
        let to = draft.to.trim().to_string();
        for address in [&to, &from] {
            if !valid_email(address) {
                return Err(DeliveryError::InvalidAddress(address.clone()));
            }
        }
        Ok((from, to))
    }

    /// Send `draft` through the relay
    pub async fn send(&self, draft: &EmailDraft) -> Result<(), DeliveryError> {
        let (from, to) = self.envelope(draft)?;
        debug!(%from, %to, host = %self.host, "SmtpSender::send: called");
        let message = draft.build_message(&from, &to)?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
            .port(self.port)
            .credentials(Credentials::new(self.user.clone(), self.password.clone()))
            .timeout(Some(SEND_TIMEOUT))
            .build();
        mailer.send(message).await?;

        info!(%to, "SmtpSender::send: email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> SmtpSender {
        SmtpSender::new("smtp.example.com", 465, "me@example.com", Some("secret".to_string())).unwrap()
    }

    #[test]
    fn test_unconfigured() {
        let config = SmtpConfig {
            password_env: "AP_TEST_SMTP_PASS_NEVER_SET".to_string(),
            ..SmtpConfig::default()
        };
        assert!(matches!(SmtpSender::from_config(&config), Err(DeliveryError::SmtpNotConfigured)));
    }

    #[test]
    fn test_each_setting_is_required() {
        let pw = || Some("secret".to_string());
        assert!(SmtpSender::new("", 465, "me@example.com", pw()).is_err());
        assert!(SmtpSender::new("smtp.example.com", 0, "me@example.com", pw()).is_err());
        assert!(SmtpSender::new("smtp.example.com", 465, " ", pw()).is_err());
        assert!(SmtpSender::new("smtp.example.com", 465, "me@example.com", None).is_err());
        assert!(SmtpSender::new("smtp.example.com", 465, "me@example.com", pw()).is_ok());
    }

    #[test]
    fn test_envelope_falls_back_to_user() {
        let draft = EmailDraft {
            to: "you@example.org".to_string(),
            ..EmailDraft::default()
        };
        let (from, to) = sender().envelope(&draft).unwrap();
        assert_eq!(from, "me@example.com");
        assert_eq!(to, "you@example.org");
    }

    #[test]
    fn test_envelope_rejects_invalid_addresses() {
        let bad_to = EmailDraft {
            to: "nobody".to_string(),
            ..EmailDraft::default()
        };
        assert!(matches!(sender().envelope(&bad_to), Err(DeliveryError::InvalidAddress(a)) if a == "nobody"));

        let bad_from = EmailDraft {
            to: "you@example.org".to_string(),
            from: "me at example".to_string(),
            ..EmailDraft::default()
        };
        assert!(sender().envelope(&bad_from).is_err());
    }
}
