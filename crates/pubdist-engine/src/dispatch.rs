//! Notification dispatch: compose one message and hand it to the transport.

use std::path::PathBuf;

use chrono::Utc;
use pubdist_core::{
  customer::Customer,
  publication::Publication,
  transport::{Delivery, MailAttachment, MailTransport},
};
use pubdist_mail::Composer;
use tracing::{debug, error, info, warn};

/// Result of a single send attempt. Never an error: a failed send is
/// reported here and logged, and the caller carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
  Delivered(Delivery),
  Failed(String),
}

impl DispatchOutcome {
  pub fn is_delivered(&self) -> bool { matches!(self, Self::Delivered(_)) }
}

/// Composes notifications and sends them through an injected transport.
pub struct Notifier<T> {
  transport: T,
  composer:  Composer,
}

impl<T: MailTransport> Notifier<T> {
  pub fn new(transport: T, composer: Composer) -> Self { Self { transport, composer } }

  pub fn transport(&self) -> &T { &self.transport }

  /// Send `publication` to `customer`.
  pub async fn dispatch(&self, publication: &Publication, customer: &Customer) -> DispatchOutcome {
    let attachment = attachment_for(publication).await;
    let mail = self.composer.compose(publication, customer, attachment, Utc::now());
    info!(to = %mail.to, subject = %mail.subject, "sending notification");
    if let Some(file) = &mail.attachment {
      debug!(file = %file.file_name, "attaching document");
    }

    match self.transport.send(mail).await {
      Ok(delivery) => {
        if let Delivery::Relayed(response) = &delivery {
          debug!(to = %customer.email, %response, "notification relayed");
        }
        DispatchOutcome::Delivered(delivery)
      }
      Err(e) => {
        error!(to = %customer.email, error = %e, "notification send failed");
        DispatchOutcome::Failed(e.to_string())
      }
    }
  }
}

/// The attachment descriptor, present only when the referenced file exists.
async fn attachment_for(publication: &Publication) -> Option<MailAttachment> {
  let reference = publication.attachment.as_ref()?;
  let path = PathBuf::from(&reference.path);
  match tokio::fs::try_exists(&path).await {
    Ok(true) => Some(MailAttachment {
      file_name: reference.display_name().to_owned(),
      path,
    }),
    Ok(false) => {
      warn!(path = %reference.path, "attachment file missing, sending without it");
      None
    }
    Err(e) => {
      warn!(path = %reference.path, error = %e, "attachment file unreadable, sending without it");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use pubdist_core::publication::AttachmentRef;

  use super::*;
  use crate::testing::{FailingTransport, RecordingTransport, composer, customer, publication};

  #[tokio::test]
  async fn delivered_mail_carries_composed_fields() {
    let notifier = Notifier::new(RecordingTransport::default(), composer());
    let mut c = customer("All Products", "All Markets", "Global");
    c.cc_emails = Some("ops@harbor.example".into());

    let outcome = notifier.dispatch(&publication(), &c).await;
    assert_eq!(outcome, DispatchOutcome::Delivered(Delivery::LoggedOnly));

    let sent = notifier.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, c.email);
    assert_eq!(sent[0].cc.as_deref(), Some("ops@harbor.example"));
    assert!(sent[0].subject.starts_with("PSI Safety Notice SN-1 – "));
  }

  #[tokio::test]
  async fn transport_failure_is_reported_not_raised() {
    let notifier = Notifier::new(FailingTransport, composer());
    let outcome = notifier
      .dispatch(&publication(), &customer("All Products", "All Markets", "Global"))
      .await;
    assert!(matches!(outcome, DispatchOutcome::Failed(_)));
  }

  #[tokio::test]
  async fn missing_attachment_file_is_skipped() {
    let notifier = Notifier::new(RecordingTransport::default(), composer());
    let mut p = publication();
    p.attachment = Some(AttachmentRef {
      path:      "/nonexistent/pubdist/sn-1.pdf".into(),
      file_name: Some("SN-1.pdf".into()),
    });
    notifier.dispatch(&p, &customer("All Products", "All Markets", "Global")).await;
    assert!(notifier.transport().sent()[0].attachment.is_none());
  }

  #[tokio::test]
  async fn existing_attachment_file_is_attached() {
    let path = std::env::temp_dir().join(format!("pubdist-{}.pdf", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, b"%PDF-1.4").await.unwrap();

    let notifier = Notifier::new(RecordingTransport::default(), composer());
    let mut p = publication();
    p.attachment = Some(AttachmentRef {
      path:      path.to_string_lossy().into_owned(),
      file_name: Some("SN-1.pdf".into()),
    });
    notifier.dispatch(&p, &customer("All Products", "All Markets", "Global")).await;

    let sent = notifier.transport().sent();
    let attached = sent[0].attachment.as_ref().unwrap();
    assert_eq!(attached.file_name, "SN-1.pdf");
    assert_eq!(attached.path, path);

    tokio::fs::remove_file(&path).await.unwrap();
  }
}
