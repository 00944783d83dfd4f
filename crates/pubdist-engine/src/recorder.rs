//! Log recorder: appends one snapshot row per send attempt.

use pubdist_core::{
  customer::Customer,
  log::{DeliveryStatus, LogEntry, NewLogEntry},
  publication::Publication,
  store::DistributionStore,
};
use tracing::debug;

use crate::{Error, Result};

/// Append a log entry capturing `publication` and `customer` as they are now.
pub async fn record<S: DistributionStore>(
  store: &S,
  publication: &Publication,
  customer: &Customer,
  status: DeliveryStatus,
  reason: impl Into<String>,
) -> Result<LogEntry> {
  let entry = store
    .append_log(NewLogEntry::snapshot(publication, customer, status, reason))
    .await
    .map_err(Error::store)?;
  debug!(
    log_id = %entry.id,
    number = %entry.publication_number,
    email = %entry.recipient_email,
    status = entry.delivery_status.as_str(),
    "distribution logged"
  );
  Ok(entry)
}

#[cfg(test)]
mod tests {
  use pubdist_store_sqlite::SqliteStore;

  use super::*;
  use crate::testing::{new_customer, new_publication};

  #[tokio::test]
  async fn snapshot_is_independent_of_later_edits() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let publication = store.add_publication(new_publication()).await.unwrap();
    let customer = store
      .add_customer(new_customer("Dana", "Harbor Power", "All Products", "Marine", "Global"))
      .await
      .unwrap();

    let entry = record(&store, &publication, &customer, DeliveryStatus::Sent, "Products: All Products")
      .await
      .unwrap();

    let mut edit = new_publication();
    edit.title = "Renamed".into();
    store.update_publication(publication.id, edit).await.unwrap();

    let stored = store.get_log(entry.id).await.unwrap().unwrap();
    assert_eq!(stored.publication_title, "Fuel line clamp inspection");
    assert_eq!(stored.recipient_company, "Harbor Power");
    assert_eq!(stored.match_reason, "Products: All Products");
  }
}
