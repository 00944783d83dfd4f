//! The distribution orchestrator.
//!
//! A run loads the publication and every active customer, evaluates each
//! customer against the publication, then fans out dispatch-then-record for
//! the matches with bounded concurrency. Each recipient's task is isolated:
//! a failed send still gets a log row, and a failed log write does not stop
//! the other tasks. The publication is marked `Distributed` once every task
//! has settled, including when nobody matched.

use std::sync::Arc;

use chrono::Utc;
use futures::StreamExt as _;
use pubdist_core::{
  customer::Customer,
  log::DeliveryStatus,
  matching::{evaluate, match_reason},
  publication::{DistributionStatus, Publication},
  store::DistributionStore,
  transport::MailTransport,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{Error, Result, dispatch::Notifier, recorder};

/// Fan-out width used when none is configured.
pub const DEFAULT_MAX_CONCURRENT_SENDS: usize = 8;

/// What one distribution run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DistributionSummary {
  pub publication_id: Uuid,
  /// Customers evaluated.
  pub evaluated:      u32,
  /// Customers that matched; stored as the publication's recipient count.
  pub recipients:     u32,
  /// Matches whose send the transport rejected.
  pub failed_sends:   u32,
  /// Matches whose log row could not be written.
  pub unlogged:       u32,
}

/// Per-recipient result of a fan-out task.
struct TaskOutcome {
  sent:   bool,
  logged: bool,
}

// ─── Distributor ─────────────────────────────────────────────────────────────

/// Owns the store and notifier handles shared by distribution and resend.
pub struct Distributor<S, T> {
  pub(crate) store:    Arc<S>,
  pub(crate) notifier: Arc<Notifier<T>>,
  max_concurrent:      usize,
}

impl<S, T> Clone for Distributor<S, T> {
  fn clone(&self) -> Self {
    Self {
      store:          Arc::clone(&self.store),
      notifier:       Arc::clone(&self.notifier),
      max_concurrent: self.max_concurrent,
    }
  }
}

impl<S, T> Distributor<S, T>
where
  S: DistributionStore,
  T: MailTransport,
{
  pub fn new(store: Arc<S>, notifier: Arc<Notifier<T>>) -> Self {
    Self { store, notifier, max_concurrent: DEFAULT_MAX_CONCURRENT_SENDS }
  }

  /// Cap on simultaneous sends within one run; zero is treated as one.
  pub fn with_max_concurrent_sends(mut self, n: usize) -> Self {
    self.max_concurrent = n.max(1);
    self
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  // ── Approval ──────────────────────────────────────────────────────────────

  /// Move a publication to `Approved`. Refuses one that is already
  /// `Distributed`, because a second run would notify everyone again.
  pub async fn approve(&self, publication_id: Uuid) -> Result<Publication> {
    let mut publication = self
      .store
      .get_publication(publication_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("publication {publication_id}")))?;

    if publication.status == DistributionStatus::Distributed {
      return Err(Error::Conflict(format!(
        "publication {} has already been distributed",
        publication.number
      )));
    }

    self
      .store
      .set_publication_status(publication_id, DistributionStatus::Approved)
      .await
      .map_err(Error::store)?;
    publication.status = DistributionStatus::Approved;
    info!(%publication_id, number = %publication.number, "publication approved");
    Ok(publication)
  }

  // ── Distribution ──────────────────────────────────────────────────────────

  /// Run distribution for `publication_id`.
  ///
  /// Not idempotent: a second call re-sends to every current match and
  /// writes new log rows.
  pub async fn distribute(&self, publication_id: Uuid) -> Result<DistributionSummary> {
    info!(%publication_id, "starting distribution");

    let Some(publication) = self
      .store
      .get_publication(publication_id)
      .await
      .map_err(Error::store)?
    else {
      warn!(%publication_id, "publication not found, distribution aborted");
      return Err(Error::NotFound(format!("publication {publication_id}")));
    };
    info!(title = %publication.title, number = %publication.number, "distributing");

    let customers = self.store.active_customers().await.map_err(Error::store)?;
    info!(count = customers.len(), "active customers loaded");
    let evaluated = customers.len();

    let matched: Vec<Customer> = customers
      .into_iter()
      .filter(|customer| {
        let report = evaluate(&publication, customer);
        debug!(
          name = %customer.contact_name,
          company = %customer.company,
          ?report,
          "{}",
          if report.is_match() { "MATCH" } else { "NO MATCH" }
        );
        report.is_match()
      })
      .collect();
    let recipients = matched.len();

    let tasks: Vec<_> = matched
      .iter()
      .map(|customer| self.deliver(&publication, customer, DeliveryStatus::Sent, match_reason(customer)))
      .collect();
    let outcomes: Vec<TaskOutcome> = futures::stream::iter(tasks)
      .buffer_unordered(self.max_concurrent)
      .collect()
      .await;

    let summary = DistributionSummary {
      publication_id,
      evaluated: saturating_u32(evaluated),
      recipients: saturating_u32(recipients),
      failed_sends: saturating_u32(outcomes.iter().filter(|o| !o.sent).count()),
      unlogged: saturating_u32(outcomes.iter().filter(|o| !o.logged).count()),
    };

    let updated = self
      .store
      .complete_distribution(publication_id, summary.recipients, Utc::now())
      .await
      .map_err(Error::store)?;
    if !updated {
      warn!(%publication_id, "publication vanished before the run completed");
    }

    info!(
      %publication_id,
      recipients = summary.recipients,
      failed_sends = summary.failed_sends,
      unlogged = summary.unlogged,
      "distribution complete"
    );
    Ok(summary)
  }

  /// Dispatch, then record. Neither step's failure stops the other.
  async fn deliver(
    &self,
    publication: &Publication,
    customer: &Customer,
    status: DeliveryStatus,
    reason: String,
  ) -> TaskOutcome {
    let sent = self.notifier.dispatch(publication, customer).await.is_delivered();
    let logged = match recorder::record(self.store.as_ref(), publication, customer, status, reason).await {
      Ok(_) => true,
      Err(e) => {
        error!(email = %customer.email, error = %e, "could not record distribution");
        false
      }
    };
    TaskOutcome { sent, logged }
  }
}

fn saturating_u32(n: usize) -> u32 { u32::try_from(n).unwrap_or(u32::MAX) }

#[cfg(test)]
mod tests {
  use pubdist_core::store::LogQuery;
  use pubdist_store_sqlite::SqliteStore;

  use super::*;
  use crate::testing::{FailingTransport, RecordingTransport, composer, new_customer, new_publication};

  async fn setup<T: MailTransport>(transport: T) -> Distributor<SqliteStore, T> {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    Distributor::new(store, Arc::new(Notifier::new(transport, composer())))
  }

  #[tokio::test]
  async fn zero_customers_still_completes() {
    let d = setup(RecordingTransport::default()).await;
    let p = d.store.add_publication(new_publication()).await.unwrap();

    let summary = d.distribute(p.id).await.unwrap();
    assert_eq!(summary.recipients, 0);

    let stored = d.store.get_publication(p.id).await.unwrap().unwrap();
    assert_eq!(stored.status, DistributionStatus::Distributed);
    assert_eq!(stored.recipients_count, 0);
    assert!(stored.published_at.is_some());
  }

  #[tokio::test]
  async fn only_matching_active_customers_are_notified_and_logged() {
    let d = setup(RecordingTransport::default()).await;
    let p = d.store.add_publication(new_publication()).await.unwrap();

    d.store
      .add_customer(new_customer("Dana", "Harbor Power", "All Products", "All Markets", "Global"))
      .await
      .unwrap();
    d.store
      .add_customer(new_customer("Alex", "Acme", "All Products", "Industrial", "North America"))
      .await
      .unwrap();
    let mut asleep = new_customer("Sam", "Dormant Co", "All Products", "All Markets", "Global");
    asleep.status = pubdist_core::customer::CustomerStatus::Inactive;
    d.store.add_customer(asleep).await.unwrap();

    let summary = d.distribute(p.id).await.unwrap();
    assert_eq!(summary.evaluated, 2);
    assert_eq!(summary.recipients, 1);

    let sent = d.notifier.transport().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "dana@harbor-power.example");

    let logs = d.store.list_logs(&LogQuery::default()).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].delivery_status, DeliveryStatus::Sent);
    assert!(logs[0].match_reason.starts_with("Products: All Products, Markets: All Markets"));
    assert_eq!(
      d.store.get_publication(p.id).await.unwrap().unwrap().recipients_count,
      1
    );
  }

  #[tokio::test]
  async fn failed_sends_are_still_logged() {
    let d = setup(FailingTransport).await;
    let p = d.store.add_publication(new_publication()).await.unwrap();
    for name in ["Dana", "Alex", "Sam"] {
      d.store
        .add_customer(new_customer(name, "Harbor Power", "All Products", "All Markets", "Global"))
        .await
        .unwrap();
    }

    let summary = d.distribute(p.id).await.unwrap();
    assert_eq!(summary.recipients, 3);
    assert_eq!(summary.failed_sends, 3);
    assert_eq!(summary.unlogged, 0);
    assert_eq!(d.store.count_logs().await.unwrap(), 3);
  }

  #[tokio::test]
  async fn redistribution_sends_and_logs_again() {
    let d = setup(RecordingTransport::default()).await;
    let p = d.store.add_publication(new_publication()).await.unwrap();
    d.store
      .add_customer(new_customer("Dana", "Harbor Power", "All Products", "All Markets", "Global"))
      .await
      .unwrap();

    d.distribute(p.id).await.unwrap();
    d.distribute(p.id).await.unwrap();
    assert_eq!(d.notifier.transport().sent().len(), 2);
    assert_eq!(d.store.count_logs().await.unwrap(), 2);
  }

  #[tokio::test]
  async fn missing_publication_is_not_found() {
    let d = setup(RecordingTransport::default()).await;
    assert!(matches!(d.distribute(Uuid::new_v4()).await, Err(Error::NotFound(_))));
  }

  #[tokio::test]
  async fn approve_guards_against_double_distribution() {
    let d = setup(RecordingTransport::default()).await;
    let p = d.store.add_publication(new_publication()).await.unwrap();

    let approved = d.approve(p.id).await.unwrap();
    assert_eq!(approved.status, DistributionStatus::Approved);
    d.distribute(p.id).await.unwrap();

    assert!(matches!(d.approve(p.id).await, Err(Error::Conflict(_))));
    assert!(matches!(d.approve(Uuid::new_v4()).await, Err(Error::NotFound(_))));
  }

  #[tokio::test]
  async fn narrow_fan_out_reaches_everyone() {
    let d = setup(RecordingTransport::default()).await.with_max_concurrent_sends(0);
    let p = d.store.add_publication(new_publication()).await.unwrap();
    for name in ["Dana", "Alex", "Sam", "Kai"] {
      d.store
        .add_customer(new_customer(name, "Harbor Power", "8.8L GSI", "Marine", "Global"))
        .await
        .unwrap();
    }
    let summary = d.distribute(p.id).await.unwrap();
    assert_eq!(summary.recipients, 4);
    assert_eq!(d.notifier.transport().sent().len(), 4);
  }
}
