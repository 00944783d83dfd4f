//! Fallback transport used when no SMTP relay is configured.

use std::convert::Infallible;

use pubdist_core::transport::{Delivery, MailTransport, OutgoingMail};
use tracing::info;

/// Records each message in the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyTransport;

impl MailTransport for LogOnlyTransport {
  type Error = Infallible;

  async fn send(&self, mail: OutgoingMail) -> Result<Delivery, Infallible> {
    info!(
      to = %mail.to,
      cc = mail.cc.as_deref().unwrap_or(""),
      subject = %mail.subject,
      attachment = mail.attachment.as_ref().map(|a| a.file_name.as_str()).unwrap_or(""),
      "smtp not configured, notification logged only"
    );
    Ok(Delivery::LoggedOnly)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn always_reports_logged_only() {
    let mail = OutgoingMail {
      from:       "publications@psi.com".into(),
      to:         "dana@harbor.example".into(),
      cc:         None,
      subject:    "subject".into(),
      html:       String::new(),
      attachment: None,
    };
    assert_eq!(LogOnlyTransport.send(mail).await.unwrap(), Delivery::LoggedOnly);
  }
}
