//! Plain-text rendering of API records, one line per record.

use pubdist_core::{
  customer::Customer,
  log::LogEntry,
  publication::Publication,
  store::DashboardStats,
};

pub fn stats(s: &DashboardStats) -> String {
  format!(
    "customers     {} ({} active)\n\
     publications  {} ({} distributed)\n\
     log entries   {}",
    s.total_customers,
    s.active_customers,
    s.total_publications,
    s.distributed_publications,
    s.total_logs,
  )
}

pub fn customer(c: &Customer) -> String {
  format!(
    "{:<12} {:<8} {:<17} {:<32} {} ({})",
    c.customer_number,
    c.status.as_str(),
    c.tier.as_str(),
    c.email,
    c.contact_name,
    c.company,
  )
}

pub fn publication(p: &Publication) -> String {
  format!(
    "{}  {:<10} {:<11} {:<15} {:>4}  {}",
    p.id,
    p.number,
    p.status.as_str(),
    p.urgency.as_str(),
    p.recipients_count,
    p.title,
  )
}

pub fn log_entry(l: &LogEntry) -> String {
  format!(
    "{}  {}  {:<6} {:<10} {} ({})",
    l.id,
    l.sent_at.format("%Y-%m-%d %H:%M"),
    l.delivery_status.as_str(),
    l.publication_number,
    l.recipient_email,
    l.recipient_company,
  )
}
