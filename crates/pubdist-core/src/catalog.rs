//! Metadata catalog: the admin-curated tag vocabularies.
//!
//! The catalog only governs what input forms offer. Matching never consults
//! it; tags are compared as opaque strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tags::TagCategory;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
  pub id:         Uuid,
  pub category:   TagCategory,
  pub value:      String,
  pub sort_order: i64,
  pub active:     bool,
  pub created_at: DateTime<Utc>,
}

/// Active catalog values grouped per category, each list in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
  pub products:      Vec<String>,
  pub markets:       Vec<String>,
  pub content_types: Vec<String>,
  pub regions:       Vec<String>,
}

impl Vocabulary {
  /// Group `entries` (already in display order), skipping inactive ones.
  pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a CatalogEntry>) -> Self {
    let mut vocab = Self::default();
    for entry in entries.into_iter().filter(|e| e.active) {
      let bucket = match entry.category {
        TagCategory::Product => &mut vocab.products,
        TagCategory::Market => &mut vocab.markets,
        TagCategory::ContentType => &mut vocab.content_types,
        TagCategory::Region => &mut vocab.regions,
      };
      bucket.push(entry.value.clone());
    }
    vocab
  }
}

/// Direction for a single-step reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
  Up,
  Down,
}

/// The vocabulary a fresh store starts with. Wildcards sit at order 0.
pub const DEFAULT_VOCABULARY: &[(TagCategory, &str)] = &[
  (TagCategory::Product, "All Products"),
  (TagCategory::Product, "8.8L GSI"),
  (TagCategory::Product, "8.8L DSI"),
  (TagCategory::Product, "22L DSI"),
  (TagCategory::Product, "4.3L GSI"),
  (TagCategory::Product, "6.0L GSI"),
  (TagCategory::Product, "3.0L GSI"),
  (TagCategory::Product, "2.4L GSI"),
  (TagCategory::Product, "8.8L LPG"),
  (TagCategory::Market, "All Markets"),
  (TagCategory::Market, "Power Systems"),
  (TagCategory::Market, "Industrial"),
  (TagCategory::Market, "On-Road"),
  (TagCategory::Market, "Material Handling"),
  (TagCategory::Market, "Specialty"),
  (TagCategory::Market, "Marine"),
  (TagCategory::Market, "Oil & Gas"),
  (TagCategory::Market, "Agriculture"),
  (TagCategory::ContentType, "All Content Types"),
  (TagCategory::ContentType, "Service Bulletin"),
  (TagCategory::ContentType, "Notice of Change"),
  (TagCategory::ContentType, "Manual Update"),
  (TagCategory::ContentType, "Safety Notice"),
  (TagCategory::ContentType, "Product Alert"),
  (TagCategory::ContentType, "Recall Notice"),
  (TagCategory::ContentType, "Technical Tip"),
  (TagCategory::ContentType, "Training Notice"),
  (TagCategory::ContentType, "Product Announcement"),
  (TagCategory::Region, "Global"),
  (TagCategory::Region, "North America"),
  (TagCategory::Region, "EMEA"),
  (TagCategory::Region, "APAC"),
  (TagCategory::Region, "LATAM"),
];
