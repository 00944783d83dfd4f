//! SMTP relay transport backed by `lettre`.

use lettre::{
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
  message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
  transport::smtp::authentication::Credentials,
};
use pubdist_core::transport::{Delivery, MailTransport, OutgoingMail};
use tracing::{debug, warn};

use crate::{Error, Result, SmtpConfig};

/// Implicit TLS is used on this port; every other port upgrades via
/// STARTTLS.
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// Delivers notifications through a configured SMTP relay.
#[derive(Clone)]
pub struct SmtpTransport {
  inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
  pub fn new(config: &SmtpConfig) -> Result<Self> {
    let builder = if config.port == IMPLICIT_TLS_PORT {
      AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
    };
    let mut builder = builder.port(config.port);
    if let (Some(user), Some(pass)) = (&config.username, &config.password) {
      builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
    }
    Ok(Self { inner: builder.build() })
  }

  async fn build_message(mail: OutgoingMail) -> Result<Message> {
    let mut builder = Message::builder()
      .from(mail.from.parse::<Mailbox>()?)
      .to(mail.to.parse::<Mailbox>()?)
      .subject(mail.subject);
    for cc in cc_addresses(mail.cc.as_deref()) {
      match cc.parse::<Mailbox>() {
        Ok(mailbox) => builder = builder.cc(mailbox),
        Err(e) => warn!(to = %mail.to, %cc, error = %e, "skipping unparseable cc address"),
      }
    }

    let html = SinglePart::html(mail.html);
    let message = match mail.attachment {
      Some(file) => {
        let bytes = tokio::fs::read(&file.path).await?;
        let content_type = ContentType::parse("application/octet-stream")
          .map_err(|e| Error::ContentType(e.to_string()))?;
        builder.multipart(
          MultiPart::mixed()
            .singlepart(html)
            .singlepart(Attachment::new(file.file_name).body(bytes, content_type)),
        )?
      }
      None => builder.singlepart(html)?,
    };
    Ok(message)
  }
}

impl MailTransport for SmtpTransport {
  type Error = Error;

  async fn send(&self, mail: OutgoingMail) -> Result<Delivery> {
    let to = mail.to.clone();
    let message = Self::build_message(mail).await?;
    let response = self.inner.send(message).await?;
    let text = format!(
      "{} {}",
      response.code(),
      response.message().collect::<Vec<_>>().join(" ")
    );
    debug!(%to, response = %text, "relay accepted message");
    Ok(Delivery::Relayed(text))
  }
}

/// Split a raw CC field on commas and semicolons, dropping blanks.
fn cc_addresses(raw: Option<&str>) -> impl Iterator<Item = &str> {
  raw
    .into_iter()
    .flat_map(|s| s.split([',', ';']))
    .map(str::trim)
    .filter(|s| !s.is_empty())
}
