//! Distribution log: the append-only audit trail of notification sends.
//!
//! Each entry snapshots publication and recipient identity at send time
//! instead of holding foreign keys, so history survives later edits and
//! deletions of the source records. Entries are never updated.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, customer::Customer, publication::{Publication, Urgency}};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliveryStatus {
  /// Sent by a distribution run.
  #[default]
  Sent,
  /// Sent again by an operator from an earlier log entry.
  Resent,
}

impl DeliveryStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Sent => "Sent",
      Self::Resent => "Resent",
    }
  }
}

impl FromStr for DeliveryStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Sent" => Ok(Self::Sent),
      "Resent" => Ok(Self::Resent),
      other => Err(Error::UnknownDeliveryStatus(other.to_owned())),
    }
  }
}

/// One stored send attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
  pub id:                 Uuid,
  pub publication_number: String,
  pub publication_title:  String,
  pub content_type:       String,
  pub urgency:            Urgency,
  pub recipient_name:     String,
  pub recipient_company:  String,
  pub recipient_email:    String,
  /// Server-assigned; never changes.
  pub sent_at:            DateTime<Utc>,
  pub delivery_status:    DeliveryStatus,
  /// Reserved for read receipts; never set by distribution.
  pub acknowledged:       bool,
  pub acknowledged_at:    Option<DateTime<Utc>>,
  pub match_reason:       String,
}

/// Input to [`crate::store::DistributionStore::append_log`].
#[derive(Debug, Clone)]
pub struct NewLogEntry {
  pub publication_number: String,
  pub publication_title:  String,
  pub content_type:       String,
  pub urgency:            Urgency,
  pub recipient_name:     String,
  pub recipient_company:  String,
  pub recipient_email:    String,
  pub delivery_status:    DeliveryStatus,
  pub match_reason:       String,
}

impl NewLogEntry {
  /// Snapshot the identity fields of `publication` and `customer`.
  pub fn snapshot(
    publication: &Publication,
    customer: &Customer,
    delivery_status: DeliveryStatus,
    match_reason: impl Into<String>,
  ) -> Self {
    Self {
      publication_number: publication.number.clone(),
      publication_title:  publication.title.clone(),
      content_type:       publication.content_type.clone(),
      urgency:            publication.urgency.clone(),
      recipient_name:     customer.contact_name.clone(),
      recipient_company:  customer.company.clone(),
      recipient_email:    customer.email.clone(),
      delivery_status,
      match_reason:       match_reason.into(),
    }
  }
}
