//! Operator-invoked resend of earlier log entries.
//!
//! A resend looks up the *current* publication (by number) and customer (by
//! email and company) rather than trusting the snapshot. If either is gone
//! the resend fails and nothing is logged.

use pubdist_core::{
  log::{DeliveryStatus, LogEntry},
  store::DistributionStore,
  transport::MailTransport,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{Error, Result, distribution::Distributor, recorder};

pub const MANUAL_RESEND_REASON: &str = "Manual resend";
pub const BULK_RESEND_REASON: &str = "Bulk resend";

impl<S, T> Distributor<S, T>
where
  S: DistributionStore,
  T: MailTransport,
{
  /// Resend the notification behind `log_id`; returns the new log entry.
  pub async fn resend(&self, log_id: Uuid) -> Result<LogEntry> {
    self.resend_with_reason(log_id, MANUAL_RESEND_REASON).await
  }

  /// Resend each id in turn, skipping any that fail. Returns how many
  /// succeeded.
  pub async fn resend_bulk(&self, log_ids: &[Uuid]) -> Result<u32> {
    if log_ids.is_empty() {
      return Err(Error::Validation("no log entries selected".into()));
    }

    let mut count = 0_u32;
    for &log_id in log_ids {
      match self.resend_with_reason(log_id, BULK_RESEND_REASON).await {
        Ok(_) => count += 1,
        Err(e) => warn!(%log_id, error = %e, "bulk resend skipped entry"),
      }
    }
    info!(requested = log_ids.len(), resent = count, "bulk resend finished");
    Ok(count)
  }

  async fn resend_with_reason(&self, log_id: Uuid, reason: &str) -> Result<LogEntry> {
    let entry = self
      .store
      .get_log(log_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("log entry {log_id}")))?;

    let publication = self
      .store
      .find_publication_by_number(&entry.publication_number)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("publication {}", entry.publication_number)))?;

    let customer = self
      .store
      .find_customer_by_email_and_company(&entry.recipient_email, &entry.recipient_company)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| {
        Error::NotFound(format!(
          "customer {} at {}",
          entry.recipient_email, entry.recipient_company
        ))
      })?;

    self.notifier.dispatch(&publication, &customer).await;
    let logged = recorder::record(
      self.store.as_ref(),
      &publication,
      &customer,
      DeliveryStatus::Resent,
      reason,
    )
    .await?;

    info!(%log_id, new_log_id = %logged.id, email = %customer.email, "notification resent");
    Ok(logged)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use pubdist_core::{customer::NewCustomer, store::LogQuery};
  use pubdist_store_sqlite::SqliteStore;

  use super::*;
  use crate::{
    dispatch::Notifier,
    testing::{RecordingTransport, composer, new_customer, new_publication},
  };

  async fn setup() -> Distributor<SqliteStore, RecordingTransport> {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    Distributor::new(store, Arc::new(Notifier::new(RecordingTransport::default(), composer())))
  }

  fn dana() -> NewCustomer {
    new_customer("Dana", "Harbor Power", "All Products", "All Markets", "Global")
  }

  /// Distribute once to `dana()` and return the resulting log entry id.
  async fn seeded(d: &Distributor<SqliteStore, RecordingTransport>) -> Uuid {
    let p = d.store.add_publication(new_publication()).await.unwrap();
    d.store.add_customer(dana()).await.unwrap();
    d.distribute(p.id).await.unwrap();
    d.store.list_logs(&LogQuery::default()).await.unwrap()[0].id
  }

  #[tokio::test]
  async fn resend_uses_current_records() {
    let d = setup().await;
    let log_id = seeded(&d).await;

    let customer = d.store.find_customer_by_email("dana@harbor-power.example").await.unwrap().unwrap();
    let mut edit = dana();
    edit.contact_name = "Dana R.".into();
    d.store.update_customer(customer.id, edit).await.unwrap();

    let entry = d.resend(log_id).await.unwrap();
    assert_eq!(entry.delivery_status, DeliveryStatus::Resent);
    assert_eq!(entry.match_reason, MANUAL_RESEND_REASON);
    assert_eq!(entry.recipient_name, "Dana R.");
    assert_eq!(d.notifier.transport().sent().len(), 2);
    assert_eq!(d.store.count_logs().await.unwrap(), 2);
  }

  #[tokio::test]
  async fn resend_fails_when_company_no_longer_matches() {
    let d = setup().await;
    let log_id = seeded(&d).await;

    let customer = d.store.find_customer_by_email("dana@harbor-power.example").await.unwrap().unwrap();
    let mut moved = dana();
    moved.company = "Harbor Marine".into();
    d.store.update_customer(customer.id, moved).await.unwrap();

    assert!(matches!(d.resend(log_id).await, Err(Error::NotFound(_))));
    assert_eq!(d.store.count_logs().await.unwrap(), 1);
    assert_eq!(d.notifier.transport().sent().len(), 1);
  }

  #[tokio::test]
  async fn resend_fails_when_publication_is_gone() {
    let d = setup().await;
    let log_id = seeded(&d).await;
    let p = d.store.find_publication_by_number("SN-1").await.unwrap().unwrap();
    d.store.delete_publication(p.id).await.unwrap();

    assert!(matches!(d.resend(log_id).await, Err(Error::NotFound(_))));
    assert_eq!(d.store.count_logs().await.unwrap(), 1);
  }

  #[tokio::test]
  async fn unknown_log_id_is_not_found() {
    let d = setup().await;
    assert!(matches!(d.resend(Uuid::new_v4()).await, Err(Error::NotFound(_))));
  }

  #[tokio::test]
  async fn bulk_resend_counts_only_successes() {
    let d = setup().await;
    let log_id = seeded(&d).await;

    let count = d
      .resend_bulk(&[log_id, Uuid::new_v4(), Uuid::new_v4()])
      .await
      .unwrap();
    assert_eq!(count, 1);
    assert_eq!(d.store.count_logs().await.unwrap(), 2);

    let logs = d.store.list_logs(&LogQuery::default()).await.unwrap();
    assert_eq!(logs[0].match_reason, BULK_RESEND_REASON);
  }

  #[tokio::test]
  async fn bulk_resend_skips_entries_whose_records_changed() {
    let d = setup().await;
    let p = d.store.add_publication(new_publication()).await.unwrap();
    for name in ["Dana", "Alex", "Sam"] {
      d.store
        .add_customer(new_customer(name, "Harbor Power", "All Products", "All Markets", "Global"))
        .await
        .unwrap();
    }
    d.distribute(p.id).await.unwrap();

    let mut retired = new_publication();
    retired.number = "SN-2".into();
    let retired = d.store.add_publication(retired).await.unwrap();
    d.distribute(retired.id).await.unwrap();

    let logs = d.store.list_logs(&LogQuery::default()).await.unwrap();
    let log_for = |number: &str, email: &str| {
      logs
        .iter()
        .find(|l| l.publication_number == number && l.recipient_email == email)
        .unwrap()
        .id
    };
    let dana = log_for("SN-1", "dana@harbor-power.example");
    let alex = log_for("SN-1", "alex@harbor-power.example");
    let sam = log_for("SN-1", "sam@harbor-power.example");
    let gone = log_for("SN-2", "dana@harbor-power.example");

    let moved = d.store.find_customer_by_email("alex@harbor-power.example").await.unwrap().unwrap();
    let mut edit = new_customer("Alex", "Harbor Power", "All Products", "All Markets", "Global");
    edit.company = "Harbor Marine".into();
    d.store.update_customer(moved.id, edit).await.unwrap();
    d.store.delete_publication(retired.id).await.unwrap();

    let logged_before = d.store.count_logs().await.unwrap();
    let sent_before = d.notifier.transport().sent().len();

    let count = d.resend_bulk(&[dana, alex, gone, sam]).await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(d.store.count_logs().await.unwrap(), logged_before + 2);

    let sent = d.notifier.transport().sent();
    let resent: Vec<&str> = sent[sent_before..].iter().map(|m| m.to.as_str()).collect();
    assert_eq!(resent, ["dana@harbor-power.example", "sam@harbor-power.example"]);

    let newest = d.store.list_logs(&LogQuery::default()).await.unwrap();
    assert!(newest[..2].iter().all(|l| l.delivery_status == DeliveryStatus::Resent
      && l.match_reason == BULK_RESEND_REASON
      && l.publication_number == "SN-1"));
  }

  #[tokio::test]
  async fn bulk_resend_rejects_empty_selection() {
    let d = setup().await;
    assert!(matches!(d.resend_bulk(&[]).await, Err(Error::Validation(_))));
  }
}
