//! The `DistributionStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `pubdist-store-sqlite`).
//! Higher layers (`pubdist-engine`, `pubdist-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  catalog::CatalogEntry,
  customer::{Customer, CustomerStatus, NewCustomer, SubscriptionTier},
  log::{LogEntry, NewLogEntry},
  publication::{DistributionStatus, NewPublication, Publication, Urgency},
  tags::TagCategory,
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`DistributionStore::list_customers`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerQuery {
  /// Substring match over contact name, company and email.
  pub search: Option<String>,
  pub status: Option<CustomerStatus>,
  pub tier:   Option<SubscriptionTier>,
}

/// Parameters for [`DistributionStore::list_publications`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicationQuery {
  /// Substring match over title and publication number.
  pub search:  Option<String>,
  pub status:  Option<DistributionStatus>,
  pub urgency: Option<Urgency>,
}

/// Parameters for [`DistributionStore::list_logs`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQuery {
  /// Substring match over publication number and title and recipient
  /// name, company and email.
  pub search:  Option<String>,
  pub urgency: Option<Urgency>,
}

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
  pub total_customers:          u64,
  pub active_customers:         u64,
  pub total_publications:       u64,
  pub distributed_publications: u64,
  pub total_logs:               u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the record store holding customers, publications, the
/// distribution log and the metadata catalog.
///
/// No operation requires a transaction spanning several calls. Log entries
/// are append-only: the trait exposes no way to modify one.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DistributionStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Customers ─────────────────────────────────────────────────────────

  /// Persist a new customer; `id` and `created_at` are assigned here.
  fn add_customer(
    &self,
    input: NewCustomer,
  ) -> impl Future<Output = Result<Customer, Self::Error>> + Send + '_;

  fn get_customer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  /// Ordered by company, then contact name.
  fn list_customers<'a>(
    &'a self,
    query: &'a CustomerQuery,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + 'a;

  /// Every customer whose status is `Active`.
  fn active_customers(
    &self,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + '_;

  /// Replace the profile fields of an existing customer. Returns `None` if
  /// `id` does not exist.
  fn update_customer(
    &self,
    id: Uuid,
    input: NewCustomer,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  /// Returns `false` if nothing was deleted.
  fn delete_customer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The first customer registered with `email`, if any.
  fn find_customer_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + 'a;

  /// The first customer with both `email` and `company`, if any.
  fn find_customer_by_email_and_company<'a>(
    &'a self,
    email: &'a str,
    company: &'a str,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + 'a;

  /// Set the status of every customer with `email`; returns how many rows
  /// changed.
  fn set_status_by_email<'a>(
    &'a self,
    email: &'a str,
    status: CustomerStatus,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  fn count_customers(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Publications ──────────────────────────────────────────────────────

  /// Persist a new `Draft` publication with zero recipients.
  fn add_publication(
    &self,
    input: NewPublication,
  ) -> impl Future<Output = Result<Publication, Self::Error>> + Send + '_;

  fn get_publication(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Publication>, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_publications<'a>(
    &'a self,
    query: &'a PublicationQuery,
  ) -> impl Future<Output = Result<Vec<Publication>, Self::Error>> + Send + 'a;

  /// Replace the editable fields. Status, recipient count and publish time
  /// are left alone. Returns `None` if `id` does not exist.
  fn update_publication(
    &self,
    id: Uuid,
    input: NewPublication,
  ) -> impl Future<Output = Result<Option<Publication>, Self::Error>> + Send + '_;

  /// Returns the deleted publication, or `None` if it did not exist.
  fn delete_publication(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Publication>, Self::Error>> + Send + '_;

  /// Returns `false` if `id` does not exist.
  fn set_publication_status(
    &self,
    id: Uuid,
    status: DistributionStatus,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Mark a run as finished: status `Distributed`, publish time
  /// `published_at`, and the run's recipient count. Returns `false` if `id`
  /// does not exist.
  fn complete_distribution(
    &self,
    id: Uuid,
    recipients_count: u32,
    published_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The earliest-created publication carrying `number`, if any.
  fn find_publication_by_number<'a>(
    &'a self,
    number: &'a str,
  ) -> impl Future<Output = Result<Option<Publication>, Self::Error>> + Send + 'a;

  // ── Distribution log: append-only ────────────────────────────────────

  /// Append one entry; `id` and `sent_at` are assigned here.
  fn append_log(
    &self,
    input: NewLogEntry,
  ) -> impl Future<Output = Result<LogEntry, Self::Error>> + Send + '_;

  fn get_log(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<LogEntry>, Self::Error>> + Send + '_;

  /// Newest first.
  fn list_logs<'a>(
    &'a self,
    query: &'a LogQuery,
  ) -> impl Future<Output = Result<Vec<LogEntry>, Self::Error>> + Send + 'a;

  fn count_logs(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  // ── Metadata catalog ──────────────────────────────────────────────────

  /// Ordered by category, sort order, then value.
  fn list_catalog(
    &self,
    active_only: bool,
  ) -> impl Future<Output = Result<Vec<CatalogEntry>, Self::Error>> + Send + '_;

  fn get_catalog_entry(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<CatalogEntry>, Self::Error>> + Send + '_;

  fn find_catalog_entry<'a>(
    &'a self,
    category: TagCategory,
    value: &'a str,
  ) -> impl Future<Output = Result<Option<CatalogEntry>, Self::Error>> + Send + 'a;

  /// Highest sort order in `category`, or `None` for an empty category.
  fn max_catalog_order(
    &self,
    category: TagCategory,
  ) -> impl Future<Output = Result<Option<i64>, Self::Error>> + Send + '_;

  fn add_catalog_entry(
    &self,
    category: TagCategory,
    value: String,
    sort_order: i64,
  ) -> impl Future<Output = Result<CatalogEntry, Self::Error>> + Send + '_;

  /// Returns `false` if `id` does not exist.
  fn rename_catalog_entry(
    &self,
    id: Uuid,
    value: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if `id` does not exist.
  fn set_catalog_order(
    &self,
    id: Uuid,
    sort_order: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if nothing was deleted.
  fn delete_catalog_entry(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Dashboard ─────────────────────────────────────────────────────────

  fn stats(&self) -> impl Future<Output = Result<DashboardStats, Self::Error>> + Send + '_;
}
