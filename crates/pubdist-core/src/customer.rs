//! Customer: a subscriber profile.
//!
//! Only [`CustomerStatus::Active`] customers are considered by a distribution
//! run. Distribution never deletes customers; status flips to `Inactive` on
//! unsubscribe or admin edit.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, tags::TagSet};

// ─── Subscription tier ───────────────────────────────────────────────────────

/// How much a customer wants to hear about.
///
/// Labels the system does not recognise are kept verbatim so that the tier
/// gate can treat them explicitly instead of failing to load the record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionTier {
  Standard,
  #[default]
  AllAnnouncements,
  Unrecognized(String),
}

impl SubscriptionTier {
  pub fn as_str(&self) -> &str {
    match self {
      Self::Standard => "Standard",
      Self::AllAnnouncements => "All Announcements",
      Self::Unrecognized(label) => label,
    }
  }
}

impl From<&str> for SubscriptionTier {
  fn from(s: &str) -> Self {
    match s {
      "Standard" => Self::Standard,
      // Legacy label from before the tier was renamed.
      "All Announcements" | "Comprehensive" => Self::AllAnnouncements,
      _ => Self::Unrecognized(s.to_owned()),
    }
  }
}

impl From<String> for SubscriptionTier {
  fn from(s: String) -> Self { Self::from(s.as_str()) }
}

impl From<SubscriptionTier> for String {
  fn from(t: SubscriptionTier) -> Self { t.as_str().to_owned() }
}

impl fmt::Display for SubscriptionTier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CustomerStatus {
  #[default]
  Active,
  Inactive,
}

impl CustomerStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Active => "Active",
      Self::Inactive => "Inactive",
    }
  }
}

impl FromStr for CustomerStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Active" => Ok(Self::Active),
      "Inactive" => Ok(Self::Inactive),
      other => Err(Error::UnknownCustomerStatus(other.to_owned())),
    }
  }
}

// ─── Customer ────────────────────────────────────────────────────────────────

pub const DEFAULT_FREQUENCY: &str = "Immediate";

/// A stored subscriber profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
  pub id:                  Uuid,
  pub contact_name:        String,
  pub company:             String,
  /// Business-facing identifier, e.g. an ERP account or `SELF-00042`.
  pub customer_number:     String,
  pub email:               String,
  /// Passed through to the mail transport untouched.
  pub cc_emails:           Option<String>,
  pub products:            TagSet,
  pub markets:             TagSet,
  pub content_types:       TagSet,
  pub regions:             TagSet,
  pub customer_type:       Option<String>,
  pub tier:                SubscriptionTier,
  pub preferred_frequency: String,
  pub status:              CustomerStatus,
  pub created_at:          DateTime<Utc>,
  pub last_notified:       Option<DateTime<Utc>>,
}

impl Customer {
  pub fn is_active(&self) -> bool { self.status == CustomerStatus::Active }
}

/// Input to [`crate::store::DistributionStore::add_customer`] and
/// [`crate::store::DistributionStore::update_customer`].
/// `id` and `created_at` are always assigned by the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
  pub contact_name:        String,
  pub company:             String,
  #[serde(default)]
  pub customer_number:     String,
  pub email:               String,
  #[serde(default)]
  pub cc_emails:           Option<String>,
  #[serde(default)]
  pub products:            TagSet,
  #[serde(default)]
  pub markets:             TagSet,
  #[serde(default)]
  pub content_types:       TagSet,
  #[serde(default)]
  pub regions:             TagSet,
  #[serde(default)]
  pub customer_type:       Option<String>,
  #[serde(default)]
  pub tier:                SubscriptionTier,
  #[serde(default = "default_frequency")]
  pub preferred_frequency: String,
  #[serde(default)]
  pub status:              CustomerStatus,
}

fn default_frequency() -> String { DEFAULT_FREQUENCY.to_owned() }

impl NewCustomer {
  /// Convenience constructor with every optional field at its default.
  pub fn new(
    contact_name: impl Into<String>,
    company: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      contact_name:        contact_name.into(),
      company:             company.into(),
      customer_number:     String::new(),
      email:               email.into(),
      cc_emails:           None,
      products:            TagSet::default(),
      markets:             TagSet::default(),
      content_types:       TagSet::default(),
      regions:             TagSet::default(),
      customer_type:       None,
      tier:                SubscriptionTier::default(),
      preferred_frequency: default_frequency(),
      status:              CustomerStatus::default(),
    }
  }
}
