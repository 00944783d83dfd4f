//! The outbound mail seam.
//!
//! A [`MailTransport`] accepts one fully composed [`OutgoingMail`] and
//! attempts delivery. Implementations live in `pubdist-mail`; the engine
//! only ever sees this trait.

use std::{future::Future, path::PathBuf};

/// A single file attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
  pub file_name: String,
  pub path:      PathBuf,
}

/// A composed notification ready for hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
  pub from:       String,
  pub to:         String,
  /// Raw CC list from the customer record, unvalidated.
  pub cc:         Option<String>,
  pub subject:    String,
  pub html:       String,
  pub attachment: Option<MailAttachment>,
}

/// What a transport did with a message it accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
  /// Handed to a relay; carries the relay's response text.
  Relayed(String),
  /// No relay is configured; the message was only logged.
  LoggedOnly,
}

/// Abstraction over a mail delivery mechanism.
pub trait MailTransport: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send(
    &self,
    mail: OutgoingMail,
  ) -> impl Future<Output = Result<Delivery, Self::Error>> + Send + '_;
}
