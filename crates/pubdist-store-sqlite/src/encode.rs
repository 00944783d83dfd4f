//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with fixed microsecond
//! precision so they sort lexically. Tag-sets are stored in their flat
//! `"; "`-joined form. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use pubdist_core::{
  catalog::CatalogEntry,
  customer::Customer,
  log::LogEntry,
  publication::{AttachmentRef, Publication},
  tags::TagSet,
};
use rusqlite::Row;
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Misc ────────────────────────────────────────────────────────────────────

fn decode_tags(s: &str) -> TagSet { TagSet::parse(Some(s)) }

fn decode_count(column: &'static str, value: i64) -> Result<u32> {
  u32::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

/// Treat a blank search string as no filter.
pub fn search_term(search: Option<&str>) -> Option<String> {
  search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned)
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const CUSTOMER_COLUMNS: &str = "customer_id, contact_name, company, customer_number, \
  email, cc_emails, products, markets, content_types, regions, customer_type, tier, \
  preferred_frequency, status, created_at, last_notified";

/// Raw strings read directly from a `customers` row.
pub struct RawCustomer {
  pub customer_id:         String,
  pub contact_name:        String,
  pub company:             String,
  pub customer_number:     String,
  pub email:               String,
  pub cc_emails:           Option<String>,
  pub products:            String,
  pub markets:             String,
  pub content_types:       String,
  pub regions:             String,
  pub customer_type:       Option<String>,
  pub tier:                String,
  pub preferred_frequency: String,
  pub status:              String,
  pub created_at:          String,
  pub last_notified:       Option<String>,
}

impl RawCustomer {
  /// Column order must match [`CUSTOMER_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      customer_id:         row.get(0)?,
      contact_name:        row.get(1)?,
      company:             row.get(2)?,
      customer_number:     row.get(3)?,
      email:               row.get(4)?,
      cc_emails:           row.get(5)?,
      products:            row.get(6)?,
      markets:             row.get(7)?,
      content_types:       row.get(8)?,
      regions:             row.get(9)?,
      customer_type:       row.get(10)?,
      tier:                row.get(11)?,
      preferred_frequency: row.get(12)?,
      status:              row.get(13)?,
      created_at:          row.get(14)?,
      last_notified:       row.get(15)?,
    })
  }

  pub fn into_customer(self) -> Result<Customer> {
    Ok(Customer {
      id:                  decode_uuid(&self.customer_id)?,
      contact_name:        self.contact_name,
      company:             self.company,
      customer_number:     self.customer_number,
      email:               self.email,
      cc_emails:           self.cc_emails,
      products:            decode_tags(&self.products),
      markets:             decode_tags(&self.markets),
      content_types:       decode_tags(&self.content_types),
      regions:             decode_tags(&self.regions),
      customer_type:       self.customer_type,
      tier:                self.tier.into(),
      preferred_frequency: self.preferred_frequency,
      status:              self.status.parse()?,
      created_at:          decode_dt(&self.created_at)?,
      last_notified:       decode_opt_dt(self.last_notified.as_deref())?,
    })
  }
}

pub const PUBLICATION_COLUMNS: &str = "publication_id, title, number, products, markets, \
  content_type, regions, urgency, summary, action_required, author_name, reviewer, status, \
  published_at, recipients_count, attachment_path, attachment_name, created_at";

/// Raw strings read directly from a `publications` row.
pub struct RawPublication {
  pub publication_id:   String,
  pub title:            String,
  pub number:           String,
  pub products:         String,
  pub markets:          String,
  pub content_type:     String,
  pub regions:          String,
  pub urgency:          String,
  pub summary:          Option<String>,
  pub action_required:  Option<String>,
  pub author_name:      Option<String>,
  pub reviewer:         Option<String>,
  pub status:           String,
  pub published_at:     Option<String>,
  pub recipients_count: i64,
  pub attachment_path:  Option<String>,
  pub attachment_name:  Option<String>,
  pub created_at:       String,
}

impl RawPublication {
  /// Column order must match [`PUBLICATION_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      publication_id:   row.get(0)?,
      title:            row.get(1)?,
      number:           row.get(2)?,
      products:         row.get(3)?,
      markets:          row.get(4)?,
      content_type:     row.get(5)?,
      regions:          row.get(6)?,
      urgency:          row.get(7)?,
      summary:          row.get(8)?,
      action_required:  row.get(9)?,
      author_name:      row.get(10)?,
      reviewer:         row.get(11)?,
      status:           row.get(12)?,
      published_at:     row.get(13)?,
      recipients_count: row.get(14)?,
      attachment_path:  row.get(15)?,
      attachment_name:  row.get(16)?,
      created_at:       row.get(17)?,
    })
  }

  pub fn into_publication(self) -> Result<Publication> {
    let attachment = self.attachment_path.map(|path| AttachmentRef {
      path,
      file_name: self.attachment_name,
    });
    Ok(Publication {
      id: decode_uuid(&self.publication_id)?,
      title: self.title,
      number: self.number,
      products: decode_tags(&self.products),
      markets: decode_tags(&self.markets),
      content_type: self.content_type,
      regions: decode_tags(&self.regions),
      urgency: self.urgency.into(),
      summary: self.summary,
      action_required: self.action_required,
      author_name: self.author_name,
      reviewer: self.reviewer,
      status: self.status.parse()?,
      published_at: decode_opt_dt(self.published_at.as_deref())?,
      recipients_count: decode_count("recipients_count", self.recipients_count)?,
      attachment,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const LOG_COLUMNS: &str = "log_id, publication_number, publication_title, content_type, \
  urgency, recipient_name, recipient_company, recipient_email, sent_at, delivery_status, \
  acknowledged, acknowledged_at, match_reason";

/// Raw strings read directly from a `distribution_logs` row.
pub struct RawLogEntry {
  pub log_id:             String,
  pub publication_number: String,
  pub publication_title:  String,
  pub content_type:       String,
  pub urgency:            String,
  pub recipient_name:     String,
  pub recipient_company:  String,
  pub recipient_email:    String,
  pub sent_at:            String,
  pub delivery_status:    String,
  pub acknowledged:       bool,
  pub acknowledged_at:    Option<String>,
  pub match_reason:       String,
}

impl RawLogEntry {
  /// Column order must match [`LOG_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      log_id:             row.get(0)?,
      publication_number: row.get(1)?,
      publication_title:  row.get(2)?,
      content_type:       row.get(3)?,
      urgency:            row.get(4)?,
      recipient_name:     row.get(5)?,
      recipient_company:  row.get(6)?,
      recipient_email:    row.get(7)?,
      sent_at:            row.get(8)?,
      delivery_status:    row.get(9)?,
      acknowledged:       row.get(10)?,
      acknowledged_at:    row.get(11)?,
      match_reason:       row.get(12)?,
    })
  }

  pub fn into_log_entry(self) -> Result<LogEntry> {
    Ok(LogEntry {
      id:                 decode_uuid(&self.log_id)?,
      publication_number: self.publication_number,
      publication_title:  self.publication_title,
      content_type:       self.content_type,
      urgency:            self.urgency.into(),
      recipient_name:     self.recipient_name,
      recipient_company:  self.recipient_company,
      recipient_email:    self.recipient_email,
      sent_at:            decode_dt(&self.sent_at)?,
      delivery_status:    self.delivery_status.parse()?,
      acknowledged:       self.acknowledged,
      acknowledged_at:    decode_opt_dt(self.acknowledged_at.as_deref())?,
      match_reason:       self.match_reason,
    })
  }
}

pub const CATALOG_COLUMNS: &str = "entry_id, category, value, sort_order, active, created_at";

/// Raw strings read directly from a `metadata` row.
pub struct RawCatalogEntry {
  pub entry_id:   String,
  pub category:   String,
  pub value:      String,
  pub sort_order: i64,
  pub active:     bool,
  pub created_at: String,
}

impl RawCatalogEntry {
  /// Column order must match [`CATALOG_COLUMNS`].
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:   row.get(0)?,
      category:   row.get(1)?,
      value:      row.get(2)?,
      sort_order: row.get(3)?,
      active:     row.get(4)?,
      created_at: row.get(5)?,
    })
  }

  pub fn into_entry(self) -> Result<CatalogEntry> {
    Ok(CatalogEntry {
      id:         decode_uuid(&self.entry_id)?,
      category:   self.category.parse()?,
      value:      self.value,
      sort_order: self.sort_order,
      active:     self.active,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
