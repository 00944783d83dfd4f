//! Recipient matching: decides whether a customer receives a publication.
//!
//! A customer matches when all five checks hold:
//!
//! | Check | Passes when |
//! |-------|-------------|
//! | product | customer has `All Products`, or the tag-sets intersect |
//! | market | customer has `All Markets`, or the tag-sets intersect |
//! | content type | customer has `All Content Types`, or lists the publication's single content type |
//! | region | customer has `Global`, or the tag-sets intersect |
//! | tier | see [`tier_allows`] |
//!
//! Wildcards only count on the customer side. A publication tagged `Global`
//! carries an ordinary region token and reaches only customers who list
//! `Global` themselves.

use serde::Serialize;

use crate::{
  customer::{Customer, SubscriptionTier},
  publication::{Publication, Urgency},
  tags::{TagCategory, TagSet},
};

/// Per-check outcome of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchReport {
  pub product:      bool,
  pub market:       bool,
  pub content_type: bool,
  pub region:       bool,
  pub tier:         bool,
}

impl MatchReport {
  pub fn is_match(&self) -> bool {
    self.product && self.market && self.content_type && self.region && self.tier
  }
}

/// Evaluate every check independently.
pub fn evaluate(publication: &Publication, customer: &Customer) -> MatchReport {
  MatchReport {
    product:      overlaps(TagCategory::Product, &publication.products, &customer.products),
    market:       overlaps(TagCategory::Market, &publication.markets, &customer.markets),
    content_type: customer.content_types.has_wildcard(TagCategory::ContentType)
      || customer.content_types.contains(&publication.content_type),
    region:       overlaps(TagCategory::Region, &publication.regions, &customer.regions),
    tier:         tier_allows(&publication.urgency, &customer.tier),
  }
}

/// True when `customer` should be notified about `publication`.
pub fn matches(publication: &Publication, customer: &Customer) -> bool {
  evaluate(publication, customer).is_match()
}

fn overlaps(category: TagCategory, publication: &TagSet, customer: &TagSet) -> bool {
  customer.has_wildcard(category) || publication.intersects(customer)
}

/// The urgency-dependent tier gate.
///
/// - `Critical/Safety` reaches every tier.
/// - `High` and `Standard` reach `Standard` and `All Announcements`.
/// - `Informational` reaches `All Announcements` only.
/// - An unrecognised urgency applies no tier restriction.
pub fn tier_allows(urgency: &Urgency, tier: &SubscriptionTier) -> bool {
  match urgency {
    Urgency::CriticalSafety => true,
    Urgency::High | Urgency::Standard => {
      matches!(tier, SubscriptionTier::Standard | SubscriptionTier::AllAnnouncements)
    }
    Urgency::Informational => matches!(tier, SubscriptionTier::AllAnnouncements),
    Urgency::Unrecognized(_) => true,
  }
}

/// Human-readable summary of the profile that drove a match, stored with
/// each log entry.
pub fn match_reason(customer: &Customer) -> String {
  format!(
    "Products: {}, Markets: {}, Content Types: {}, Regions: {}",
    customer.products, customer.markets, customer.content_types, customer.regions,
  )
}
