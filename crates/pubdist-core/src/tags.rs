//! Tag-sets: ordered lists of free-text category values.
//!
//! Customers and publications store their products, markets, content types
//! and regions as flat `"; "`-joined strings. [`TagSet`] is the parsed form.
//! Parsing trims every token and drops empty ones, but keeps the input order
//! and never deduplicates: two `"A"` tokens stay two tokens.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// Separator written by [`TagSet::join`]. Parsing splits on the bare `;`.
pub const SEPARATOR: &str = "; ";

// ─── Categories ──────────────────────────────────────────────────────────────

/// The four tag vocabularies. Each has exactly one wildcard literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagCategory {
  Product,
  Market,
  ContentType,
  Region,
}

impl TagCategory {
  pub const ALL: [TagCategory; 4] = [
    TagCategory::Product,
    TagCategory::Market,
    TagCategory::ContentType,
    TagCategory::Region,
  ];

  /// The reserved value that, in a *customer's* tag-set, satisfies this
  /// category for every publication.
  pub fn wildcard(self) -> &'static str {
    match self {
      Self::Product => "All Products",
      Self::Market => "All Markets",
      Self::ContentType => "All Content Types",
      Self::Region => "Global",
    }
  }

  /// The key used for this category in the metadata catalog.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Product => "product",
      Self::Market => "market",
      Self::ContentType => "content_type",
      Self::Region => "region",
    }
  }
}

impl fmt::Display for TagCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for TagCategory {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "product" => Ok(Self::Product),
      "market" => Ok(Self::Market),
      "content_type" => Ok(Self::ContentType),
      "region" => Ok(Self::Region),
      other => Err(Error::UnknownCategory(other.to_owned())),
    }
  }
}

// ─── TagSet ──────────────────────────────────────────────────────────────────

/// An ordered list of trimmed, non-empty tag tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
  /// Parse a stored `;`-delimited value. `None` and `""` give an empty set.
  pub fn parse(raw: Option<&str>) -> Self {
    let tokens = raw
      .unwrap_or_default()
      .split(';')
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_owned)
      .collect();
    Self(tokens)
  }

  /// Build a set from already-separated values (e.g. a multi-select form
  /// field). Each value goes through the same trim/drop-empty rule as
  /// [`TagSet::parse`].
  pub fn from_tags<I, T>(tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
  {
    let tokens = tags
      .into_iter()
      .map(|t| t.as_ref().trim().to_owned())
      .filter(|t| !t.is_empty())
      .collect();
    Self(tokens)
  }

  /// Serialise back to the flat stored form, `"; "`-separated.
  pub fn join(&self) -> String { self.0.join(SEPARATOR) }

  /// Exact, case-sensitive membership test.
  pub fn contains(&self, tag: &str) -> bool {
    self.0.iter().any(|t| t == tag)
  }

  /// True when at least one token appears in both sets.
  pub fn intersects(&self, other: &TagSet) -> bool {
    self.0.iter().any(|t| other.contains(t))
  }

  /// True when the set carries the wildcard literal for `category`.
  pub fn has_wildcard(&self, category: TagCategory) -> bool {
    self.contains(category.wildcard())
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.0.iter().map(String::as_str)
  }

  pub fn as_slice(&self) -> &[String] { &self.0 }
}

impl fmt::Display for TagSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.join())
  }
}

/// Accepts either a JSON array of strings or a single delimited string.
impl<'de> Deserialize<'de> for TagSet {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
      List(Vec<String>),
      Flat(Option<String>),
    }

    Ok(match Wire::deserialize(deserializer)? {
      Wire::List(tags) => TagSet::from_tags(tags),
      Wire::Flat(raw) => TagSet::parse(raw.as_deref()),
    })
  }
}

/// Free-function form of [`TagSet::parse`].
pub fn parse_tag_set(raw: Option<&str>) -> TagSet { TagSet::parse(raw) }

/// Free-function form of [`TagSet::join`] for raw form input.
pub fn join_tag_set<T: AsRef<str>>(tokens: &[T]) -> String {
  TagSet::from_tags(tokens).join()
}
