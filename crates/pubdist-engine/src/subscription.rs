//! Self-service subscribe and unsubscribe.

use pubdist_core::{
  customer::{Customer, CustomerStatus, DEFAULT_FREQUENCY, NewCustomer, SubscriptionTier},
  store::DistributionStore,
  tags::TagSet,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Error, Result};

/// Customer type given to self-service sign-ups that leave it blank.
pub const DEFAULT_CUSTOMER_TYPE: &str = "End User";

/// The public sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscribeForm {
  #[serde(default)]
  pub contact_name:  String,
  #[serde(default)]
  pub company:       String,
  #[serde(default)]
  pub email:         String,
  #[serde(default)]
  pub cc_emails:     Option<String>,
  #[serde(default)]
  pub products:      TagSet,
  #[serde(default)]
  pub markets:       TagSet,
  #[serde(default)]
  pub content_types: TagSet,
  #[serde(default)]
  pub regions:       TagSet,
  #[serde(default)]
  pub customer_type: Option<String>,
  #[serde(default)]
  pub tier:          Option<SubscriptionTier>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "customer", rename_all = "snake_case")]
pub enum SubscribeOutcome {
  Created(Customer),
  Reactivated(Customer),
}

impl SubscribeOutcome {
  pub fn customer(&self) -> &Customer {
    match self {
      Self::Created(c) | Self::Reactivated(c) => c,
    }
  }

  pub fn message(&self) -> &'static str {
    match self {
      Self::Created(_) => "Thank you! You are now subscribed to publication notifications.",
      Self::Reactivated(_) => "Welcome back! Your subscription has been reactivated.",
    }
  }
}

/// Register a new subscriber, or reactivate an inactive one with the same
/// email.
pub async fn subscribe<S: DistributionStore>(
  store: &S,
  form: SubscribeForm,
) -> Result<SubscribeOutcome> {
  let contact_name = form.contact_name.trim();
  let company = form.company.trim();
  let email = form.email.trim();
  if contact_name.is_empty() || company.is_empty() || email.is_empty() {
    return Err(Error::Validation("Name, company, and email are required".into()));
  }

  let existing = store.find_customer_by_email(email).await.map_err(Error::store)?;

  let customer_type = form
    .customer_type
    .filter(|t| !t.trim().is_empty())
    .unwrap_or_else(|| DEFAULT_CUSTOMER_TYPE.to_owned());
  let tier = form
    .tier
    .clone()
    .filter(|t| !t.as_str().trim().is_empty())
    .unwrap_or(SubscriptionTier::AllAnnouncements);
  let profile = |customer_number: String, preferred_frequency: String| NewCustomer {
    contact_name: contact_name.to_owned(),
    company: company.to_owned(),
    customer_number,
    email: email.to_owned(),
    cc_emails: form.cc_emails.clone().filter(|cc| !cc.trim().is_empty()),
    products: form.products.clone(),
    markets: form.markets.clone(),
    content_types: form.content_types.clone(),
    regions: form.regions.clone(),
    customer_type: Some(customer_type.clone()),
    tier: tier.clone(),
    preferred_frequency,
    status: CustomerStatus::Active,
  };

  match existing {
    Some(existing) if existing.status == CustomerStatus::Inactive => {
      let input = profile(existing.customer_number, existing.preferred_frequency);
      let customer = store
        .update_customer(existing.id, input)
        .await
        .map_err(Error::store)?
        .ok_or_else(|| Error::NotFound(format!("customer {}", existing.id)))?;
      info!(%email, "subscription reactivated");
      Ok(SubscribeOutcome::Reactivated(customer))
    }
    Some(_) => Err(Error::Conflict(
      "This email is already subscribed. Contact support to update your profile.".into(),
    )),
    None => {
      let count = store.count_customers().await.map_err(Error::store)?;
      let number = format!("SELF-{:05}", count + 1);
      let customer = store
        .add_customer(profile(number, DEFAULT_FREQUENCY.to_owned()))
        .await
        .map_err(Error::store)?;
      info!(%email, number = %customer.customer_number, "new self-service subscriber");
      Ok(SubscribeOutcome::Created(customer))
    }
  }
}

/// Mark every customer with `email` inactive. Returns how many changed.
pub async fn unsubscribe<S: DistributionStore>(store: &S, email: &str) -> Result<u64> {
  let email = email.trim();
  if email.is_empty() {
    return Err(Error::Validation("email is required".into()));
  }
  if store.find_customer_by_email(email).await.map_err(Error::store)?.is_none() {
    return Err(Error::NotFound(format!("email address {email}")));
  }
  let changed = store
    .set_status_by_email(email, CustomerStatus::Inactive)
    .await
    .map_err(Error::store)?;
  info!(%email, changed, "unsubscribed");
  Ok(changed)
}

#[cfg(test)]
mod tests {
  use pubdist_store_sqlite::SqliteStore;

  use super::*;

  fn form(email: &str) -> SubscribeForm {
    SubscribeForm {
      contact_name: "Dana Reyes".into(),
      company: "Harbor Power".into(),
      email: email.into(),
      products: TagSet::parse(Some("8.8L GSI")),
      markets: TagSet::parse(Some("Marine")),
      content_types: TagSet::parse(Some("All Content Types")),
      regions: TagSet::parse(Some("Global")),
      ..Default::default()
    }
  }

  #[tokio::test]
  async fn new_subscriber_gets_self_number_and_defaults() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .add_customer(NewCustomer::new("Alex", "Acme", "alex@acme.example"))
      .await
      .unwrap();

    let outcome = subscribe(&store, form("dana@harbor.example")).await.unwrap();
    let SubscribeOutcome::Created(customer) = outcome else {
      panic!("expected a new customer");
    };
    assert_eq!(customer.customer_number, "SELF-00002");
    assert_eq!(customer.customer_type.as_deref(), Some(DEFAULT_CUSTOMER_TYPE));
    assert_eq!(customer.tier, SubscriptionTier::AllAnnouncements);
    assert_eq!(customer.status, CustomerStatus::Active);
  }

  #[tokio::test]
  async fn blank_tier_falls_back_to_all_announcements() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let f: SubscribeForm = serde_json::from_value(serde_json::json!({
      "contact_name": "Dana Reyes",
      "company": "Harbor Power",
      "email": "dana@harbor.example",
      "tier": "  ",
    }))
    .unwrap();

    let outcome = subscribe(&store, f).await.unwrap();
    assert_eq!(outcome.customer().tier, SubscriptionTier::AllAnnouncements);

    let stored = store.find_customer_by_email("dana@harbor.example").await.unwrap().unwrap();
    assert_eq!(stored.tier, SubscriptionTier::AllAnnouncements);
    assert!(pubdist_core::matching::tier_allows(
      &pubdist_core::publication::Urgency::High,
      &stored.tier
    ));
  }

  #[tokio::test]
  async fn missing_required_fields_are_rejected() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let mut f = form("dana@harbor.example");
    f.company = "  ".into();
    assert!(matches!(subscribe(&store, f).await, Err(Error::Validation(_))));
    assert_eq!(store.count_customers().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn active_email_conflicts_and_inactive_is_reactivated() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    subscribe(&store, form("dana@harbor.example")).await.unwrap();
    assert!(matches!(
      subscribe(&store, form("dana@harbor.example")).await,
      Err(Error::Conflict(_))
    ));

    assert_eq!(unsubscribe(&store, "dana@harbor.example").await.unwrap(), 1);

    let mut again = form("dana@harbor.example");
    again.tier = Some(SubscriptionTier::Standard);
    let outcome = subscribe(&store, again).await.unwrap();
    assert!(matches!(outcome, SubscribeOutcome::Reactivated(_)));
    let customer = outcome.customer();
    assert_eq!(customer.status, CustomerStatus::Active);
    assert_eq!(customer.tier, SubscriptionTier::Standard);
    assert_eq!(customer.customer_number, "SELF-00001");
    assert_eq!(store.count_customers().await.unwrap(), 1);
  }

  #[tokio::test]
  async fn unsubscribe_unknown_email_is_not_found() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    assert!(matches!(
      unsubscribe(&store, "ghost@nowhere.example").await,
      Err(Error::NotFound(_))
    ));
  }
}
