//! Shared fixtures for engine tests.

use std::sync::Mutex;

use chrono::Utc;
use pubdist_core::{
  customer::{Customer, CustomerStatus, NewCustomer, SubscriptionTier},
  publication::{DistributionStatus, NewPublication, Publication, Urgency},
  tags::TagSet,
  transport::{Delivery, MailTransport, OutgoingMail},
};
use pubdist_mail::Composer;
use uuid::Uuid;

// ─── Transports ──────────────────────────────────────────────────────────────

/// Accepts everything and remembers it.
#[derive(Default)]
pub struct RecordingTransport {
  sent: Mutex<Vec<OutgoingMail>>,
}

impl RecordingTransport {
  pub fn sent(&self) -> Vec<OutgoingMail> { self.sent.lock().unwrap().clone() }
}

impl MailTransport for RecordingTransport {
  type Error = std::io::Error;

  async fn send(&self, mail: OutgoingMail) -> Result<Delivery, Self::Error> {
    self.sent.lock().unwrap().push(mail);
    Ok(Delivery::LoggedOnly)
  }
}

/// Rejects everything.
pub struct FailingTransport;

impl MailTransport for FailingTransport {
  type Error = std::io::Error;

  async fn send(&self, _mail: OutgoingMail) -> Result<Delivery, Self::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "relay refused"))
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

pub fn composer() -> Composer {
  Composer::new(
    "publications@psi.com",
    "http://localhost:3000",
    "PSI",
    "Power Solutions International",
  )
  .unwrap()
}

/// A `Critical/Safety` notice for `8.8L GSI` / `Marine` / `Global`.
pub fn new_publication() -> NewPublication {
  let mut p = NewPublication::new("Fuel line clamp inspection", "SN-1");
  p.products = TagSet::parse(Some("8.8L GSI"));
  p.markets = TagSet::parse(Some("Marine"));
  p.content_type = "Safety Notice".into();
  p.regions = TagSet::parse(Some("Global"));
  p.urgency = Urgency::CriticalSafety;
  p
}

pub fn publication() -> Publication {
  let input = new_publication();
  Publication {
    id:               Uuid::new_v4(),
    title:            input.title,
    number:           input.number,
    products:         input.products,
    markets:          input.markets,
    content_type:     input.content_type,
    regions:          input.regions,
    urgency:          input.urgency,
    summary:          None,
    action_required:  None,
    author_name:      None,
    reviewer:         None,
    status:           DistributionStatus::Approved,
    published_at:     None,
    recipients_count: 0,
    attachment:       None,
    created_at:       Utc::now(),
  }
}

pub fn new_customer(
  name: &str,
  company: &str,
  products: &str,
  markets: &str,
  regions: &str,
) -> NewCustomer {
  let email = format!("{}@{}.example", name.to_lowercase(), company.to_lowercase().replace(' ', "-"));
  let mut c = NewCustomer::new(name, company, email);
  c.products = TagSet::parse(Some(products));
  c.markets = TagSet::parse(Some(markets));
  c.content_types = TagSet::parse(Some("All Content Types"));
  c.regions = TagSet::parse(Some(regions));
  c.tier = SubscriptionTier::Standard;
  c
}

pub fn customer(products: &str, markets: &str, regions: &str) -> Customer {
  let input = new_customer("Dana", "Harbor Power", products, markets, regions);
  Customer {
    id:                  Uuid::new_v4(),
    contact_name:        input.contact_name,
    company:             input.company,
    customer_number:     "C-1".into(),
    email:               input.email,
    cc_emails:           None,
    products:            input.products,
    markets:             input.markets,
    content_types:       input.content_types,
    regions:             input.regions,
    customer_type:       None,
    tier:                input.tier,
    preferred_frequency: input.preferred_frequency,
    status:              CustomerStatus::Active,
    created_at:          Utc::now(),
    last_notified:       None,
  }
}
