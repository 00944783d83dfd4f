//! Publication: an uploaded document plus its distribution metadata.
//!
//! Lifecycle: created `Draft`, moved to `Approved` by an admin, then to
//! `Distributed` by the orchestrator once a run completes. `recipients_count`
//! and `published_at` are written only by the orchestrator.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, tags::TagSet};

// ─── Urgency ─────────────────────────────────────────────────────────────────

/// How urgent a publication is; drives the tier gate in
/// [`crate::matching`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Urgency {
  CriticalSafety,
  High,
  #[default]
  Standard,
  Informational,
  /// A label outside the known four, kept verbatim.
  Unrecognized(String),
}

impl Urgency {
  pub fn as_str(&self) -> &str {
    match self {
      Self::CriticalSafety => "Critical/Safety",
      Self::High => "High",
      Self::Standard => "Standard",
      Self::Informational => "Informational",
      Self::Unrecognized(label) => label,
    }
  }
}

impl From<&str> for Urgency {
  fn from(s: &str) -> Self {
    match s {
      "Critical/Safety" => Self::CriticalSafety,
      "High" => Self::High,
      "Standard" => Self::Standard,
      "Informational" => Self::Informational,
      other => Self::Unrecognized(other.to_owned()),
    }
  }
}

impl From<String> for Urgency {
  fn from(s: String) -> Self { Self::from(s.as_str()) }
}

impl From<Urgency> for String {
  fn from(u: Urgency) -> Self { u.as_str().to_owned() }
}

impl fmt::Display for Urgency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Distribution status ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DistributionStatus {
  #[default]
  Draft,
  Approved,
  Distributed,
}

impl DistributionStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Draft => "Draft",
      Self::Approved => "Approved",
      Self::Distributed => "Distributed",
    }
  }
}

impl FromStr for DistributionStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "Draft" => Ok(Self::Draft),
      "Approved" => Ok(Self::Approved),
      "Distributed" => Ok(Self::Distributed),
      other => Err(Error::UnknownDistributionStatus(other.to_owned())),
    }
  }
}

// ─── Attachment ──────────────────────────────────────────────────────────────

/// A reference to the uploaded document on disk. No bytes live in the
/// record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef {
  /// Location of the stored file.
  pub path:      String,
  /// The name the file was uploaded with; shown to recipients.
  pub file_name: Option<String>,
}

impl AttachmentRef {
  /// The name recipients see: the upload name, else the last path segment.
  pub fn display_name(&self) -> &str {
    match self.file_name.as_deref() {
      Some(name) if !name.is_empty() => name,
      _ => self
        .path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(self.path.as_str()),
    }
  }
}

// ─── Publication ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
  pub id:                 Uuid,
  pub title:              String,
  /// Human-facing identifier. Not unique at the data layer.
  pub number:             String,
  pub products:           TagSet,
  pub markets:            TagSet,
  /// A single value, not a tag-set.
  pub content_type:       String,
  pub regions:            TagSet,
  pub urgency:            Urgency,
  pub summary:            Option<String>,
  pub action_required:    Option<String>,
  pub author_name:        Option<String>,
  pub reviewer:           Option<String>,
  pub status:             DistributionStatus,
  pub published_at:       Option<DateTime<Utc>>,
  /// Fan-out of the most recent distribution run.
  pub recipients_count:   u32,
  pub attachment:         Option<AttachmentRef>,
  pub created_at:         DateTime<Utc>,
}

/// The admin-editable fields of a publication. Used both to create one
/// (status `Draft`, zero recipients) and to edit it; editing never touches
/// status, recipient count or publish time.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPublication {
  pub title:           String,
  pub number:          String,
  #[serde(default)]
  pub products:        TagSet,
  #[serde(default)]
  pub markets:         TagSet,
  #[serde(default)]
  pub content_type:    String,
  #[serde(default)]
  pub regions:         TagSet,
  #[serde(default)]
  pub urgency:         Urgency,
  #[serde(default)]
  pub summary:         Option<String>,
  #[serde(default)]
  pub action_required: Option<String>,
  #[serde(default)]
  pub author_name:     Option<String>,
  #[serde(default)]
  pub reviewer:        Option<String>,
  #[serde(default)]
  pub attachment:      Option<AttachmentRef>,
}

impl NewPublication {
  pub fn new(title: impl Into<String>, number: impl Into<String>) -> Self {
    Self {
      title:           title.into(),
      number:          number.into(),
      products:        TagSet::default(),
      markets:         TagSet::default(),
      content_type:    String::new(),
      regions:         TagSet::default(),
      urgency:         Urgency::default(),
      summary:         None,
      action_required: None,
      author_name:     None,
      reviewer:        None,
      attachment:      None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn urgency_labels_round_trip() {
    for label in ["Critical/Safety", "High", "Standard", "Informational"] {
      let urgency = Urgency::from(label);
      assert!(!matches!(urgency, Urgency::Unrecognized(_)), "{label}");
      assert_eq!(urgency.as_str(), label);
    }
  }

  #[test]
  fn unknown_urgency_is_kept() {
    let urgency: Urgency = serde_json::from_str(r#""Routine""#).unwrap();
    assert_eq!(urgency, Urgency::Unrecognized("Routine".into()));
    assert_eq!(serde_json::to_string(&urgency).unwrap(), r#""Routine""#);
  }

  #[test]
  fn attachment_name_falls_back_to_path() {
    let named = AttachmentRef {
      path:      "uploads/1700000000-sb-101.pdf".into(),
      file_name: Some("SB-101.pdf".into()),
    };
    assert_eq!(named.display_name(), "SB-101.pdf");

    let unnamed = AttachmentRef { path: "uploads/sb-101.pdf".into(), file_name: None };
    assert_eq!(unnamed.display_name(), "sb-101.pdf");
  }
}
