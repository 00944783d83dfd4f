//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::Utc;
use pubdist_core::{
  catalog::{DEFAULT_VOCABULARY, Vocabulary},
  customer::{CustomerStatus, NewCustomer, SubscriptionTier},
  log::{DeliveryStatus, NewLogEntry},
  publication::{AttachmentRef, DistributionStatus, NewPublication, Urgency},
  store::{CustomerQuery, DistributionStore, LogQuery, PublicationQuery},
  tags::{TagCategory, TagSet},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn dana() -> NewCustomer {
  let mut c = NewCustomer::new("Dana Reyes", "Harbor Power", "dana@harbor.example");
  c.customer_number = "C-100".into();
  c.products = TagSet::parse(Some("8.8L GSI; 22L DSI"));
  c.markets = TagSet::parse(Some("Marine"));
  c.content_types = TagSet::parse(Some("All Content Types"));
  c.regions = TagSet::parse(Some("Global"));
  c.tier = SubscriptionTier::Standard;
  c
}

fn bulletin(number: &str) -> NewPublication {
  let mut p = NewPublication::new("Coolant service interval", number);
  p.products = TagSet::parse(Some("8.8L GSI"));
  p.markets = TagSet::parse(Some("Marine"));
  p.content_type = "Service Bulletin".into();
  p.regions = TagSet::parse(Some("EMEA"));
  p.urgency = Urgency::High;
  p
}

// ─── Customers ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_customer() {
  let s = store().await;
  let added = s.add_customer(dana()).await.unwrap();
  assert_eq!(added.status, CustomerStatus::Active);

  let fetched = s.get_customer(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.contact_name, "Dana Reyes");
  assert_eq!(fetched.products.as_slice(), ["8.8L GSI", "22L DSI"]);
  assert_eq!(fetched.tier, SubscriptionTier::Standard);
  assert_eq!(fetched.preferred_frequency, "Immediate");
  assert!(fetched.last_notified.is_none());
}

#[tokio::test]
async fn get_customer_missing_returns_none() {
  let s = store().await;
  assert!(s.get_customer(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_customers_filters_and_orders() {
  let s = store().await;
  s.add_customer(dana()).await.unwrap();
  let mut other = NewCustomer::new("Alex Kim", "Acme Engines", "alex@acme.example");
  other.status = CustomerStatus::Inactive;
  s.add_customer(other).await.unwrap();

  let all = s.list_customers(&CustomerQuery::default()).await.unwrap();
  let companies: Vec<_> = all.iter().map(|c| c.company.as_str()).collect();
  assert_eq!(companies, ["Acme Engines", "Harbor Power"]);

  let search = CustomerQuery { search: Some("harbor".into()), ..Default::default() };
  assert_eq!(s.list_customers(&search).await.unwrap().len(), 1);

  let blank = CustomerQuery { search: Some("  ".into()), ..Default::default() };
  assert_eq!(s.list_customers(&blank).await.unwrap().len(), 2);

  let inactive = CustomerQuery {
    status: Some(CustomerStatus::Inactive),
    ..Default::default()
  };
  let found = s.list_customers(&inactive).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].contact_name, "Alex Kim");

  let active = s.active_customers().await.unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0].contact_name, "Dana Reyes");
}

#[tokio::test]
async fn update_customer_keeps_identity() {
  let s = store().await;
  let added = s.add_customer(dana()).await.unwrap();

  let mut edit = dana();
  edit.markets = TagSet::parse(Some("Industrial; Marine"));
  let updated = s.update_customer(added.id, edit).await.unwrap().unwrap();
  assert_eq!(updated.id, added.id);
  assert_eq!(updated.markets.join(), "Industrial; Marine");
  assert_eq!(
    updated.created_at.timestamp_micros(),
    added.created_at.timestamp_micros()
  );

  assert!(s.update_customer(Uuid::new_v4(), dana()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_customer_reports_outcome() {
  let s = store().await;
  let added = s.add_customer(dana()).await.unwrap();
  assert!(s.delete_customer(added.id).await.unwrap());
  assert!(!s.delete_customer(added.id).await.unwrap());
  assert_eq!(s.count_customers().await.unwrap(), 0);
}

#[tokio::test]
async fn lookup_by_email_and_company() {
  let s = store().await;
  let first = s.add_customer(dana()).await.unwrap();
  let mut second = dana();
  second.company = "Harbor Marine".into();
  s.add_customer(second).await.unwrap();

  let by_email = s.find_customer_by_email("dana@harbor.example").await.unwrap().unwrap();
  assert_eq!(by_email.id, first.id);

  let by_both = s
    .find_customer_by_email_and_company("dana@harbor.example", "Harbor Marine")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(by_both.company, "Harbor Marine");

  assert!(
    s.find_customer_by_email_and_company("dana@harbor.example", "Nobody")
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn set_status_by_email_touches_every_match() {
  let s = store().await;
  s.add_customer(dana()).await.unwrap();
  let mut second = dana();
  second.company = "Harbor Marine".into();
  s.add_customer(second).await.unwrap();

  let n = s
    .set_status_by_email("dana@harbor.example", CustomerStatus::Inactive)
    .await
    .unwrap();
  assert_eq!(n, 2);
  assert!(s.active_customers().await.unwrap().is_empty());
  assert_eq!(
    s.set_status_by_email("ghost@nowhere.example", CustomerStatus::Inactive)
      .await
      .unwrap(),
    0
  );
}

// ─── Publications ────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_publication_starts_as_draft() {
  let s = store().await;
  let mut input = bulletin("SB-101");
  input.attachment = Some(AttachmentRef {
    path:      "uploads/sb-101.pdf".into(),
    file_name: Some("SB-101.pdf".into()),
  });
  let added = s.add_publication(input).await.unwrap();
  assert_eq!(added.status, DistributionStatus::Draft);
  assert_eq!(added.recipients_count, 0);

  let fetched = s.get_publication(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.urgency, Urgency::High);
  assert_eq!(fetched.content_type, "Service Bulletin");
  assert_eq!(fetched.attachment, added.attachment);
  assert!(fetched.published_at.is_none());
}

#[tokio::test]
async fn unknown_urgency_survives_storage() {
  let s = store().await;
  let mut input = bulletin("SB-102");
  input.urgency = Urgency::from("Routine");
  let added = s.add_publication(input).await.unwrap();
  let fetched = s.get_publication(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.urgency, Urgency::Unrecognized("Routine".into()));
}

#[tokio::test]
async fn complete_distribution_sets_status_count_and_time() {
  let s = store().await;
  let added = s.add_publication(bulletin("SB-101")).await.unwrap();
  let now = Utc::now();

  assert!(s.set_publication_status(added.id, DistributionStatus::Approved).await.unwrap());
  assert!(s.complete_distribution(added.id, 7, now).await.unwrap());

  let fetched = s.get_publication(added.id).await.unwrap().unwrap();
  assert_eq!(fetched.status, DistributionStatus::Distributed);
  assert_eq!(fetched.recipients_count, 7);
  assert_eq!(
    fetched.published_at.map(|t| t.timestamp_micros()),
    Some(now.timestamp_micros())
  );

  assert!(!s.complete_distribution(Uuid::new_v4(), 1, now).await.unwrap());
}

#[tokio::test]
async fn update_publication_leaves_distribution_fields() {
  let s = store().await;
  let added = s.add_publication(bulletin("SB-101")).await.unwrap();
  s.complete_distribution(added.id, 3, Utc::now()).await.unwrap();

  let mut edit = bulletin("SB-101");
  edit.title = "Coolant service interval (rev. B)".into();
  let updated = s.update_publication(added.id, edit).await.unwrap().unwrap();
  assert_eq!(updated.title, "Coolant service interval (rev. B)");
  assert_eq!(updated.status, DistributionStatus::Distributed);
  assert_eq!(updated.recipients_count, 3);
}

#[tokio::test]
async fn find_by_number_returns_earliest() {
  let s = store().await;
  let first = s.add_publication(bulletin("SB-101")).await.unwrap();
  s.add_publication(bulletin("SB-101")).await.unwrap();

  let found = s.find_publication_by_number("SB-101").await.unwrap().unwrap();
  assert_eq!(found.id, first.id);
  assert!(s.find_publication_by_number("SB-999").await.unwrap().is_none());
}

#[tokio::test]
async fn list_publications_newest_first_with_filters() {
  let s = store().await;
  s.add_publication(bulletin("SB-101")).await.unwrap();
  let mut notice = bulletin("SN-7");
  notice.title = "Fuel line recall".into();
  notice.urgency = Urgency::CriticalSafety;
  s.add_publication(notice).await.unwrap();

  let all = s.list_publications(&PublicationQuery::default()).await.unwrap();
  let numbers: Vec<_> = all.iter().map(|p| p.number.as_str()).collect();
  assert_eq!(numbers, ["SN-7", "SB-101"]);

  let critical = PublicationQuery {
    urgency: Some(Urgency::CriticalSafety),
    ..Default::default()
  };
  assert_eq!(s.list_publications(&critical).await.unwrap().len(), 1);

  let search = PublicationQuery { search: Some("coolant".into()), ..Default::default() };
  let found = s.list_publications(&search).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].number, "SB-101");
}

#[tokio::test]
async fn delete_publication_returns_record() {
  let s = store().await;
  let added = s.add_publication(bulletin("SB-101")).await.unwrap();
  let deleted = s.delete_publication(added.id).await.unwrap().unwrap();
  assert_eq!(deleted.id, added.id);
  assert!(s.delete_publication(added.id).await.unwrap().is_none());
}

// ─── Distribution log ────────────────────────────────────────────────────────

#[tokio::test]
async fn log_entries_snapshot_and_survive_deletion() {
  let s = store().await;
  let customer = s.add_customer(dana()).await.unwrap();
  let publication = s.add_publication(bulletin("SB-101")).await.unwrap();

  let entry = s
    .append_log(NewLogEntry::snapshot(
      &publication,
      &customer,
      DeliveryStatus::Sent,
      "Products: 8.8L GSI, Markets: Marine",
    ))
    .await
    .unwrap();
  assert!(!entry.acknowledged);

  s.delete_publication(publication.id).await.unwrap();
  s.delete_customer(customer.id).await.unwrap();

  let fetched = s.get_log(entry.id).await.unwrap().unwrap();
  assert_eq!(fetched.publication_number, "SB-101");
  assert_eq!(fetched.recipient_email, "dana@harbor.example");
  assert_eq!(fetched.delivery_status, DeliveryStatus::Sent);
  assert_eq!(fetched.urgency, Urgency::High);
  assert_eq!(fetched.match_reason, "Products: 8.8L GSI, Markets: Marine");
}

#[tokio::test]
async fn list_logs_newest_first_with_search() {
  let s = store().await;
  let customer = s.add_customer(dana()).await.unwrap();
  let first = s.add_publication(bulletin("SB-101")).await.unwrap();
  let second = s.add_publication(bulletin("SB-202")).await.unwrap();

  s.append_log(NewLogEntry::snapshot(&first, &customer, DeliveryStatus::Sent, ""))
    .await
    .unwrap();
  s.append_log(NewLogEntry::snapshot(&second, &customer, DeliveryStatus::Resent, ""))
    .await
    .unwrap();

  let all = s.list_logs(&LogQuery::default()).await.unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(all[0].publication_number, "SB-202");
  assert_eq!(all[0].delivery_status, DeliveryStatus::Resent);

  let search = LogQuery { search: Some("SB-101".into()), ..Default::default() };
  assert_eq!(s.list_logs(&search).await.unwrap().len(), 1);
  assert_eq!(s.count_logs().await.unwrap(), 2);
}

// ─── Metadata catalog ────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_store_is_seeded_once() {
  let s = store().await;
  let entries = s.list_catalog(false).await.unwrap();
  assert_eq!(entries.len(), DEFAULT_VOCABULARY.len());

  let vocab = Vocabulary::from_entries(&entries);
  assert_eq!(vocab.products.first().map(String::as_str), Some("All Products"));
  assert_eq!(vocab.regions.first().map(String::as_str), Some("Global"));

  s.init_schema().await.unwrap();
  assert_eq!(s.list_catalog(false).await.unwrap().len(), DEFAULT_VOCABULARY.len());
}

#[tokio::test]
async fn catalog_add_rename_reorder_delete() {
  let s = store().await;
  let max = s.max_catalog_order(TagCategory::Product).await.unwrap().unwrap();

  let added = s
    .add_catalog_entry(TagCategory::Product, "12L DSI".into(), max + 1)
    .await
    .unwrap();
  let found = s
    .find_catalog_entry(TagCategory::Product, "12L DSI")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.id, added.id);
  assert_eq!(found.sort_order, max + 1);

  assert!(s.rename_catalog_entry(added.id, "12L GSI".into()).await.unwrap());
  assert!(s.set_catalog_order(added.id, 0).await.unwrap());
  let renamed = s.get_catalog_entry(added.id).await.unwrap().unwrap();
  assert_eq!(renamed.value, "12L GSI");
  assert_eq!(renamed.sort_order, 0);

  assert!(s.delete_catalog_entry(added.id).await.unwrap());
  assert!(s.get_catalog_entry(added.id).await.unwrap().is_none());
  assert!(!s.delete_catalog_entry(added.id).await.unwrap());
}

#[tokio::test]
async fn empty_category_has_no_max_order() {
  let s = store().await;
  for entry in s.list_catalog(false).await.unwrap() {
    if entry.category == TagCategory::Region {
      s.delete_catalog_entry(entry.id).await.unwrap();
    }
  }
  assert_eq!(s.max_catalog_order(TagCategory::Region).await.unwrap(), None);
}

// ─── Dashboard ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_count_each_table() {
  let s = store().await;
  let customer = s.add_customer(dana()).await.unwrap();
  let mut inactive = NewCustomer::new("Alex Kim", "Acme Engines", "alex@acme.example");
  inactive.status = CustomerStatus::Inactive;
  s.add_customer(inactive).await.unwrap();

  let publication = s.add_publication(bulletin("SB-101")).await.unwrap();
  s.add_publication(bulletin("SB-102")).await.unwrap();
  s.complete_distribution(publication.id, 1, Utc::now()).await.unwrap();
  s.append_log(NewLogEntry::snapshot(&publication, &customer, DeliveryStatus::Sent, ""))
    .await
    .unwrap();

  let stats = s.stats().await.unwrap();
  assert_eq!(stats.total_customers, 2);
  assert_eq!(stats.active_customers, 1);
  assert_eq!(stats.total_publications, 2);
  assert_eq!(stats.distributed_publications, 1);
  assert_eq!(stats.total_logs, 1);
}
