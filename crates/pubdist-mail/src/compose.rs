//! Publication notification composer.
//!
//! Builds the subject line and HTML body for one recipient. The body is a
//! single-column table layout that renders in common mail clients without
//! external stylesheets.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Utc};
use pubdist_core::{
  customer::Customer,
  publication::Publication,
  tags::TagSet,
  transport::{MailAttachment, OutgoingMail},
};
use url::Url;

use crate::{Error, Result};

/// Subject lines carry at most this many characters of the title.
pub const SUBJECT_TITLE_LIMIT: usize = 50;

// ─── Composer ────────────────────────────────────────────────────────────────

/// Sender identity and links shared by every notification.
#[derive(Debug, Clone)]
pub struct Composer {
  from:         String,
  base_url:     Url,
  /// Short brand prefixed to subject lines, e.g. `PSI`.
  brand:        String,
  /// Full organisation name used in the header and footer.
  organisation: String,
}

impl Composer {
  pub fn new(
    from: impl Into<String>,
    base_url: &str,
    brand: impl Into<String>,
    organisation: impl Into<String>,
  ) -> Result<Self> {
    let base_url = Url::parse(base_url)?;
    if base_url.cannot_be_a_base() {
      return Err(Error::CannotBeABase(base_url.to_string()));
    }
    Ok(Self {
      from: from.into(),
      base_url,
      brand: brand.into(),
      organisation: organisation.into(),
    })
  }

  pub fn from_address(&self) -> &str { &self.from }

  /// `"<brand> <content type> <number> – <title, cut to 50 chars>"`.
  pub fn subject(&self, publication: &Publication) -> String {
    format!(
      "{} {} {} – {}",
      self.brand,
      publication.content_type,
      publication.number,
      short_title(&publication.title),
    )
  }

  /// Link that lets `email` unsubscribe, relative to the public base URL.
  pub fn unsubscribe_url(&self, email: &str) -> String {
    let mut url = self.base_url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push("unsubscribe");
    }
    url.query_pairs_mut().clear().append_pair("email", email);
    url.to_string()
  }

  /// Compose the full message for `customer`. `attachment` is included
  /// verbatim; the caller decides whether the referenced file is usable.
  pub fn compose(
    &self,
    publication: &Publication,
    customer: &Customer,
    attachment: Option<MailAttachment>,
    now: DateTime<Utc>,
  ) -> OutgoingMail {
    OutgoingMail {
      from:       self.from.clone(),
      to:         customer.email.clone(),
      cc:         customer.cc_emails.clone().filter(|cc| !cc.trim().is_empty()),
      subject:    self.subject(publication),
      html:       self.html_body(publication, &customer.email, attachment.as_ref(), now),
      attachment,
    }
  }

  fn html_body(
    &self,
    publication: &Publication,
    email: &str,
    attachment: Option<&MailAttachment>,
    now: DateTime<Utc>,
  ) -> String {
    let heading = format!("{} {}", publication.content_type, publication.number);
    let release_date = now.format("%B %-d, %Y");

    let mut body = String::with_capacity(4096);
    let _ = write!(
      body,
      "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
       <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
       <title>{title}</title>\n</head>\n\
       <body style=\"margin:0; padding:0; background-color:#f6f7f9; font-family:Arial, sans-serif; color:#222;\">\n\
       <div style=\"display:none; max-height:0; overflow:hidden;\">{heading}. {title}.</div>\n\
       <table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\">\n\
       <tr><td align=\"center\" style=\"padding:24px 12px;\">\n\
       <table role=\"presentation\" width=\"600\" cellpadding=\"0\" cellspacing=\"0\" \
       style=\"background-color:#ffffff; border:1px solid #e6e8eb; border-radius:10px;\">\n\
       <tr><td style=\"padding:20px 24px; border-bottom:3px solid #43A047;\">\n\
       <div style=\"font-size:12px; letter-spacing:1px; color:#666;\">{organisation}</div>\n\
       <div style=\"font-size:13px; color:#888;\">Publication Notification</div>\n\
       </td></tr>\n\
       <tr><td style=\"padding:24px;\">\n\
       <div style=\"font-size:12px; color:#43A047; font-weight:bold;\">{heading}</div>\n\
       <h1 style=\"font-size:20px; margin:6px 0 4px 0;\">{title}</h1>\n\
       <div style=\"font-size:12px; color:#888; margin:0 0 16px 0;\">Released {release_date}</div>\n",
      title = escape(&publication.title),
      heading = escape(&heading),
      organisation = escape(&self.organisation.to_uppercase()),
    );

    let applies_to = [
      ("Products", &publication.products),
      ("Markets", &publication.markets),
      ("Regions", &publication.regions),
    ];
    if applies_to.iter().any(|(_, tags)| !tags.is_empty()) {
      body.push_str(
        "<div style=\"border:1px solid #e6e8eb; border-radius:8px; padding:14px; margin:0 0 16px 0;\">\n\
         <div style=\"font-size:12px; font-weight:bold; color:#666; margin:0 0 6px 0;\">APPLIES TO</div>\n",
      );
      for (label, tags) in applies_to {
        write_applies_line(&mut body, label, tags);
      }
      body.push_str("</div>\n");
    }

    if let Some(summary) = non_blank(publication.summary.as_deref()) {
      let _ = writeln!(
        body,
        "<div style=\"font-size:14px; line-height:1.65; margin:0 0 12px 0;\">{}</div>",
        escape(summary),
      );
    }

    if let Some(action) = non_blank(publication.action_required.as_deref()) {
      let _ = writeln!(
        body,
        "<div style=\"border-left:4px solid #dc3545; background-color:#fdf2f3; padding:12px 14px; margin:0 0 16px 0;\">\
         <div style=\"font-size:12px; font-weight:bold; color:#dc3545;\">ACTION REQUIRED</div>\
         <div style=\"font-size:14px; line-height:1.55;\">{}</div></div>",
        escape(action),
      );
    }

    if let Some(file) = attachment {
      let _ = writeln!(
        body,
        "<div style=\"border:1px solid #e6e8eb; background-color:#fbfbfc; border-radius:8px; padding:14px; margin:0 0 16px 0;\">\
         <div style=\"font-size:12px; color:#666;\">Attached document</div>\
         <div style=\"font-size:14px; font-weight:bold;\">{}</div></div>",
        escape(&file.file_name),
      );
    }

    let _ = write!(
      body,
      "<div style=\"font-size:13px; color:#666;\">Questions: reply to this email or contact Technical Support.</div>\n\
       </td></tr>\n\
       <tr><td style=\"padding:16px 24px; border-top:1px solid #e6e8eb; font-size:11px; color:#999;\">\n\
       You received this notification based on your {brand} distribution profile.<br>\n\
       <a href=\"{unsubscribe}\" style=\"color:#999;\">Unsubscribe</a><br>\n\
       &copy; {year} {organisation}. All rights reserved.\n\
       </td></tr>\n</table>\n</td></tr>\n</table>\n</body>\n</html>\n",
      brand = escape(&self.brand),
      unsubscribe = escape(&self.unsubscribe_url(email)),
      year = now.year(),
      organisation = escape(&self.organisation),
    );

    body
  }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// The first [`SUBJECT_TITLE_LIMIT`] characters of `title`, trimmed when cut.
fn short_title(title: &str) -> &str {
  match title.char_indices().nth(SUBJECT_TITLE_LIMIT) {
    Some((cut, _)) => title[..cut].trim(),
    None => title,
  }
}

fn write_applies_line(body: &mut String, label: &str, tags: &TagSet) {
  if tags.is_empty() {
    return;
  }
  let joined = tags.iter().map(escape).collect::<Vec<_>>().join(", ");
  let _ = writeln!(
    body,
    "<div style=\"font-size:13px; color:#444; line-height:1.55;\"><strong>{label}:</strong> {joined}</div>",
  );
}

fn non_blank(s: Option<&str>) -> Option<&str> {
  s.filter(|s| !s.trim().is_empty())
}

/// Escape text for an HTML element body or a double-quoted attribute.
fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}
