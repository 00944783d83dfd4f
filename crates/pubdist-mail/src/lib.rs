//! Notification composition and delivery.
//!
//! [`Composer`] turns a publication and a recipient into an
//! [`OutgoingMail`](pubdist_core::transport::OutgoingMail). A
//! [`ConfiguredTransport`] then sends it through an SMTP relay, or only logs
//! it when no relay is configured.

pub mod compose;
pub mod error;
mod log_only;
mod smtp;

use pubdist_core::transport::{Delivery, MailTransport, OutgoingMail};
use serde::Deserialize;
use tracing::{info, warn};

pub use self::{
  compose::Composer,
  error::{Error, Result},
  log_only::LogOnlyTransport,
  smtp::SmtpTransport,
};

fn default_smtp_port() -> u16 { 587 }

/// Relay settings. Credentials are optional; the relay may accept
/// unauthenticated submissions.
#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
  pub host:     String,
  #[serde(default = "default_smtp_port")]
  pub port:     u16,
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub password: Option<String>,
}

// ─── Transport selection ─────────────────────────────────────────────────────

/// The transport picked at startup.
#[derive(Clone)]
pub enum ConfiguredTransport {
  Smtp(SmtpTransport),
  LogOnly(LogOnlyTransport),
}

impl ConfiguredTransport {
  /// SMTP when a relay host is configured, otherwise log-only.
  pub fn from_config(smtp: Option<&SmtpConfig>) -> Result<Self> {
    match smtp {
      Some(config) if !config.host.trim().is_empty() => {
        info!(host = %config.host, port = config.port, "using smtp relay");
        if config.username.is_none() || config.password.is_none() {
          warn!("smtp credentials incomplete, sending unauthenticated");
        }
        Ok(Self::Smtp(SmtpTransport::new(config)?))
      }
      _ => {
        info!("no smtp relay configured, notifications will only be logged");
        Ok(Self::LogOnly(LogOnlyTransport))
      }
    }
  }

  pub fn is_log_only(&self) -> bool { matches!(self, Self::LogOnly(_)) }
}

impl MailTransport for ConfiguredTransport {
  type Error = Error;

  async fn send(&self, mail: OutgoingMail) -> Result<Delivery> {
    match self {
      Self::Smtp(smtp) => smtp.send(mail).await,
      Self::LogOnly(log) => log.send(mail).await.map_err(|never| match never {}),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_host_selects_log_only() {
    assert!(ConfiguredTransport::from_config(None).unwrap().is_log_only());

    let blank = SmtpConfig {
      host:     "  ".into(),
      port:     587,
      username: None,
      password: None,
    };
    assert!(ConfiguredTransport::from_config(Some(&blank)).unwrap().is_log_only());
  }

  #[tokio::test]
  async fn host_selects_smtp() {
    let config = SmtpConfig {
      host:     "smtp.example.com".into(),
      port:     465,
      username: Some("relay".into()),
      password: Some("secret".into()),
    };
    assert!(!ConfiguredTransport::from_config(Some(&config)).unwrap().is_log_only());
  }
}
