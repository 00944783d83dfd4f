//! [`SqliteStore`]: the SQLite implementation of [`DistributionStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use pubdist_core::{
  catalog::{CatalogEntry, DEFAULT_VOCABULARY},
  customer::{Customer, CustomerStatus, NewCustomer},
  log::{LogEntry, NewLogEntry},
  publication::{DistributionStatus, NewPublication, Publication},
  store::{CustomerQuery, DashboardStats, DistributionStore, LogQuery, PublicationQuery},
  tags::TagCategory,
};
use rusqlite::OptionalExtension as _;
use tracing::info;
use uuid::Uuid;

use crate::{
  Result,
  encode::{
    CATALOG_COLUMNS, CUSTOMER_COLUMNS, LOG_COLUMNS, PUBLICATION_COLUMNS, RawCatalogEntry,
    RawCustomer, RawLogEntry, RawPublication, encode_dt, encode_uuid, search_term,
  },
  error::Error,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A distribution store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Apply the schema, then seed the metadata catalog if it is empty.
  pub(crate) async fn init_schema(&self) -> Result<()> {
    let now = encode_dt(Utc::now());
    let mut next_order = [0_i64; TagCategory::ALL.len()];
    let seed: Vec<(String, &'static str, &'static str, i64)> = DEFAULT_VOCABULARY
      .iter()
      .map(|&(category, value)| {
        let slot = &mut next_order[category as usize];
        let order = *slot;
        *slot += 1;
        (encode_uuid(Uuid::new_v4()), category.as_str(), value, order)
      })
      .collect();

    let seeded = self
      .conn
      .call(move |conn| {
        conn.execute_batch(SCHEMA)?;
        let existing: i64 =
          conn.query_row("SELECT COUNT(*) FROM metadata", [], |r| r.get(0))?;
        if existing > 0 {
          return Ok(0);
        }
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO metadata (entry_id, category, value, sort_order, active, created_at)
             VALUES (?1, ?2, ?3, ?4, 1, ?5)",
          )?;
          for (id, category, value, order) in &seed {
            stmt.execute(rusqlite::params![id, category, value, order, now])?;
          }
        }
        tx.commit()?;
        Ok(seed.len())
      })
      .await?;

    if seeded > 0 {
      info!(entries = seeded, "seeded default metadata catalog");
    }
    Ok(())
  }

  async fn count(&self, sql: &'static str) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(sql, [], |r| r.get(0))?))
      .await?;
    Ok(u64::try_from(n).unwrap_or_default())
  }

  async fn customer_where(
    &self,
    clause: &'static str,
    args: Vec<String>,
  ) -> Result<Option<Customer>> {
    let raw: Option<RawCustomer> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE {clause} ORDER BY rowid LIMIT 1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(args), RawCustomer::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawCustomer::into_customer).transpose()
  }

  async fn customers_where(
    &self,
    clause: &'static str,
    args: Vec<Option<String>>,
  ) -> Result<Vec<Customer>> {
    let raws: Vec<RawCustomer> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE {clause} ORDER BY company, contact_name"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(args), RawCustomer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawCustomer::into_customer).collect()
  }

  async fn publication_where(
    &self,
    clause: &'static str,
    arg: String,
  ) -> Result<Option<Publication>> {
    let raw: Option<RawPublication> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PUBLICATION_COLUMNS} FROM publications WHERE {clause} ORDER BY rowid LIMIT 1"
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![arg], RawPublication::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawPublication::into_publication).transpose()
  }

  /// Run an `UPDATE`/`DELETE` and report how many rows it touched.
  async fn execute(
    &self,
    sql: &'static str,
    args: Vec<rusqlite::types::Value>,
  ) -> Result<usize> {
    Ok(
      self
        .conn
        .call(move |conn| Ok(conn.execute(sql, rusqlite::params_from_iter(args))?))
        .await?,
    )
  }
}

fn text(s: impl Into<String>) -> rusqlite::types::Value {
  rusqlite::types::Value::Text(s.into())
}

fn opt_text(s: Option<String>) -> rusqlite::types::Value {
  s.map_or(rusqlite::types::Value::Null, rusqlite::types::Value::Text)
}

/// Editable customer columns in `UPDATE` / `INSERT` order.
fn customer_values(input: NewCustomer) -> Vec<rusqlite::types::Value> {
  vec![
    text(input.contact_name),
    text(input.company),
    text(input.customer_number),
    text(input.email),
    opt_text(input.cc_emails),
    text(input.products.join()),
    text(input.markets.join()),
    text(input.content_types.join()),
    text(input.regions.join()),
    opt_text(input.customer_type),
    text(input.tier.as_str()),
    text(input.preferred_frequency),
    text(input.status.as_str()),
  ]
}

/// Editable publication columns in `UPDATE` / `INSERT` order.
fn publication_values(input: NewPublication) -> Vec<rusqlite::types::Value> {
  let (path, name) = match input.attachment {
    Some(a) => (Some(a.path), a.file_name),
    None => (None, None),
  };
  vec![
    text(input.title),
    text(input.number),
    text(input.products.join()),
    text(input.markets.join()),
    text(input.content_type),
    text(input.regions.join()),
    text(input.urgency.as_str()),
    opt_text(input.summary),
    opt_text(input.action_required),
    opt_text(input.author_name),
    opt_text(input.reviewer),
    opt_text(path),
    opt_text(name),
  ]
}

// ─── DistributionStore impl ──────────────────────────────────────────────────

impl DistributionStore for SqliteStore {
  type Error = Error;

  // ── Customers ─────────────────────────────────────────────────────────────

  async fn add_customer(&self, input: NewCustomer) -> Result<Customer> {
    let customer = Customer {
      id:                  Uuid::new_v4(),
      contact_name:        input.contact_name.clone(),
      company:             input.company.clone(),
      customer_number:     input.customer_number.clone(),
      email:               input.email.clone(),
      cc_emails:           input.cc_emails.clone(),
      products:            input.products.clone(),
      markets:             input.markets.clone(),
      content_types:       input.content_types.clone(),
      regions:             input.regions.clone(),
      customer_type:       input.customer_type.clone(),
      tier:                input.tier.clone(),
      preferred_frequency: input.preferred_frequency.clone(),
      status:              input.status,
      created_at:          Utc::now(),
      last_notified:       None,
    };
    let mut values = vec![text(encode_uuid(customer.id))];
    values.extend(customer_values(input));
    values.push(text(encode_dt(customer.created_at)));

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO customers (
             customer_id, contact_name, company, customer_number, email, cc_emails,
             products, markets, content_types, regions, customer_type, tier,
             preferred_frequency, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
          rusqlite::params_from_iter(values),
        )?;
        Ok(())
      })
      .await?;

    Ok(customer)
  }

  async fn get_customer(&self, id: Uuid) -> Result<Option<Customer>> {
    self.customer_where("customer_id = ?1", vec![encode_uuid(id)]).await
  }

  async fn list_customers<'a>(&'a self, query: &'a CustomerQuery) -> Result<Vec<Customer>> {
    let args = vec![
      search_term(query.search.as_deref()),
      query.status.map(|s| s.as_str().to_owned()),
      query.tier.as_ref().map(|t| t.as_str().to_owned()),
    ];
    self
      .customers_where(
        "(?1 IS NULL
           OR contact_name LIKE '%' || ?1 || '%'
           OR company LIKE '%' || ?1 || '%'
           OR email LIKE '%' || ?1 || '%')
         AND (?2 IS NULL OR status = ?2)
         AND (?3 IS NULL OR tier = ?3)",
        args,
      )
      .await
  }

  async fn active_customers(&self) -> Result<Vec<Customer>> {
    self
      .customers_where("status = ?1", vec![Some(CustomerStatus::Active.as_str().to_owned())])
      .await
  }

  async fn update_customer(&self, id: Uuid, input: NewCustomer) -> Result<Option<Customer>> {
    let mut values = customer_values(input);
    values.push(text(encode_uuid(id)));
    let changed = self
      .execute(
        "UPDATE customers SET
           contact_name = ?1, company = ?2, customer_number = ?3, email = ?4,
           cc_emails = ?5, products = ?6, markets = ?7, content_types = ?8,
           regions = ?9, customer_type = ?10, tier = ?11, preferred_frequency = ?12,
           status = ?13
         WHERE customer_id = ?14",
        values,
      )
      .await?;
    if changed == 0 {
      return Ok(None);
    }
    self.get_customer(id).await
  }

  async fn delete_customer(&self, id: Uuid) -> Result<bool> {
    let n = self
      .execute("DELETE FROM customers WHERE customer_id = ?1", vec![text(encode_uuid(id))])
      .await?;
    Ok(n > 0)
  }

  async fn find_customer_by_email<'a>(&'a self, email: &'a str) -> Result<Option<Customer>> {
    self.customer_where("email = ?1", vec![email.to_owned()]).await
  }

  async fn find_customer_by_email_and_company<'a>(
    &'a self,
    email: &'a str,
    company: &'a str,
  ) -> Result<Option<Customer>> {
    self
      .customer_where("email = ?1 AND company = ?2", vec![email.to_owned(), company.to_owned()])
      .await
  }

  async fn set_status_by_email<'a>(
    &'a self,
    email: &'a str,
    status: CustomerStatus,
  ) -> Result<u64> {
    let n = self
      .execute(
        "UPDATE customers SET status = ?1 WHERE email = ?2",
        vec![text(status.as_str()), text(email)],
      )
      .await?;
    Ok(n as u64)
  }

  async fn count_customers(&self) -> Result<u64> {
    self.count("SELECT COUNT(*) FROM customers").await
  }

  // ── Publications ──────────────────────────────────────────────────────────

  async fn add_publication(&self, input: NewPublication) -> Result<Publication> {
    let publication = Publication {
      id:               Uuid::new_v4(),
      title:            input.title.clone(),
      number:           input.number.clone(),
      products:         input.products.clone(),
      markets:          input.markets.clone(),
      content_type:     input.content_type.clone(),
      regions:          input.regions.clone(),
      urgency:          input.urgency.clone(),
      summary:          input.summary.clone(),
      action_required:  input.action_required.clone(),
      author_name:      input.author_name.clone(),
      reviewer:         input.reviewer.clone(),
      status:           DistributionStatus::Draft,
      published_at:     None,
      recipients_count: 0,
      attachment:       input.attachment.clone(),
      created_at:       Utc::now(),
    };
    let mut values = vec![text(encode_uuid(publication.id))];
    values.extend(publication_values(input));
    values.push(text(publication.status.as_str()));
    values.push(text(encode_dt(publication.created_at)));

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO publications (
             publication_id, title, number, products, markets, content_type, regions,
             urgency, summary, action_required, author_name, reviewer,
             attachment_path, attachment_name, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
          rusqlite::params_from_iter(values),
        )?;
        Ok(())
      })
      .await?;

    Ok(publication)
  }

  async fn get_publication(&self, id: Uuid) -> Result<Option<Publication>> {
    self.publication_where("publication_id = ?1", encode_uuid(id)).await
  }

  async fn list_publications<'a>(
    &'a self,
    query: &'a PublicationQuery,
  ) -> Result<Vec<Publication>> {
    let search = search_term(query.search.as_deref());
    let status = query.status.map(|s| s.as_str().to_owned());
    let urgency = query.urgency.as_ref().map(|u| u.as_str().to_owned());

    let raws: Vec<RawPublication> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {PUBLICATION_COLUMNS} FROM publications
           WHERE (?1 IS NULL OR title LIKE '%' || ?1 || '%' OR number LIKE '%' || ?1 || '%')
             AND (?2 IS NULL OR status = ?2)
             AND (?3 IS NULL OR urgency = ?3)
           ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![search, status, urgency], RawPublication::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawPublication::into_publication).collect()
  }

  async fn update_publication(
    &self,
    id: Uuid,
    input: NewPublication,
  ) -> Result<Option<Publication>> {
    let mut values = publication_values(input);
    values.push(text(encode_uuid(id)));
    let changed = self
      .execute(
        "UPDATE publications SET
           title = ?1, number = ?2, products = ?3, markets = ?4, content_type = ?5,
           regions = ?6, urgency = ?7, summary = ?8, action_required = ?9,
           author_name = ?10, reviewer = ?11, attachment_path = ?12, attachment_name = ?13
         WHERE publication_id = ?14",
        values,
      )
      .await?;
    if changed == 0 {
      return Ok(None);
    }
    self.get_publication(id).await
  }

  async fn delete_publication(&self, id: Uuid) -> Result<Option<Publication>> {
    let Some(existing) = self.get_publication(id).await? else {
      return Ok(None);
    };
    self
      .execute(
        "DELETE FROM publications WHERE publication_id = ?1",
        vec![text(encode_uuid(id))],
      )
      .await?;
    Ok(Some(existing))
  }

  async fn set_publication_status(&self, id: Uuid, status: DistributionStatus) -> Result<bool> {
    let n = self
      .execute(
        "UPDATE publications SET status = ?1 WHERE publication_id = ?2",
        vec![text(status.as_str()), text(encode_uuid(id))],
      )
      .await?;
    Ok(n > 0)
  }

  async fn complete_distribution(
    &self,
    id: Uuid,
    recipients_count: u32,
    published_at: DateTime<Utc>,
  ) -> Result<bool> {
    let n = self
      .execute(
        "UPDATE publications SET status = ?1, published_at = ?2, recipients_count = ?3
         WHERE publication_id = ?4",
        vec![
          text(DistributionStatus::Distributed.as_str()),
          text(encode_dt(published_at)),
          rusqlite::types::Value::Integer(i64::from(recipients_count)),
          text(encode_uuid(id)),
        ],
      )
      .await?;
    Ok(n > 0)
  }

  async fn find_publication_by_number<'a>(
    &'a self,
    number: &'a str,
  ) -> Result<Option<Publication>> {
    self.publication_where("number = ?1", number.to_owned()).await
  }

  // ── Distribution log ──────────────────────────────────────────────────────

  async fn append_log(&self, input: NewLogEntry) -> Result<LogEntry> {
    let entry = LogEntry {
      id:                 Uuid::new_v4(),
      publication_number: input.publication_number,
      publication_title:  input.publication_title,
      content_type:       input.content_type,
      urgency:            input.urgency,
      recipient_name:     input.recipient_name,
      recipient_company:  input.recipient_company,
      recipient_email:    input.recipient_email,
      sent_at:            Utc::now(),
      delivery_status:    input.delivery_status,
      acknowledged:       false,
      acknowledged_at:    None,
      match_reason:       input.match_reason,
    };

    let values = vec![
      text(encode_uuid(entry.id)),
      text(entry.publication_number.clone()),
      text(entry.publication_title.clone()),
      text(entry.content_type.clone()),
      text(entry.urgency.as_str()),
      text(entry.recipient_name.clone()),
      text(entry.recipient_company.clone()),
      text(entry.recipient_email.clone()),
      text(encode_dt(entry.sent_at)),
      text(entry.delivery_status.as_str()),
      text(entry.match_reason.clone()),
    ];

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO distribution_logs (
             log_id, publication_number, publication_title, content_type, urgency,
             recipient_name, recipient_company, recipient_email, sent_at,
             delivery_status, match_reason
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params_from_iter(values),
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn get_log(&self, id: Uuid) -> Result<Option<LogEntry>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawLogEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {LOG_COLUMNS} FROM distribution_logs WHERE log_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawLogEntry::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawLogEntry::into_log_entry).transpose()
  }

  async fn list_logs<'a>(&'a self, query: &'a LogQuery) -> Result<Vec<LogEntry>> {
    let search = search_term(query.search.as_deref());
    let urgency = query.urgency.as_ref().map(|u| u.as_str().to_owned());

    let raws: Vec<RawLogEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {LOG_COLUMNS} FROM distribution_logs
           WHERE (?1 IS NULL
                  OR publication_number LIKE '%' || ?1 || '%'
                  OR publication_title LIKE '%' || ?1 || '%'
                  OR recipient_name LIKE '%' || ?1 || '%'
                  OR recipient_company LIKE '%' || ?1 || '%'
                  OR recipient_email LIKE '%' || ?1 || '%')
             AND (?2 IS NULL OR urgency = ?2)
           ORDER BY sent_at DESC, rowid DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![search, urgency], RawLogEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawLogEntry::into_log_entry).collect()
  }

  async fn count_logs(&self) -> Result<u64> {
    self.count("SELECT COUNT(*) FROM distribution_logs").await
  }

  // ── Metadata catalog ──────────────────────────────────────────────────────

  async fn list_catalog(&self, active_only: bool) -> Result<Vec<CatalogEntry>> {
    let raws: Vec<RawCatalogEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CATALOG_COLUMNS} FROM metadata
           WHERE (?1 = 0 OR active = 1)
           ORDER BY category, sort_order, value"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![active_only], RawCatalogEntry::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawCatalogEntry::into_entry).collect()
  }

  async fn get_catalog_entry(&self, id: Uuid) -> Result<Option<CatalogEntry>> {
    let id_str = encode_uuid(id);
    let raw: Option<RawCatalogEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {CATALOG_COLUMNS} FROM metadata WHERE entry_id = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawCatalogEntry::from_row)
            .optional()?,
        )
      })
      .await?;
    raw.map(RawCatalogEntry::into_entry).transpose()
  }

  async fn find_catalog_entry<'a>(
    &'a self,
    category: TagCategory,
    value: &'a str,
  ) -> Result<Option<CatalogEntry>> {
    let value = value.to_owned();
    let raw: Option<RawCatalogEntry> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {CATALOG_COLUMNS} FROM metadata WHERE category = ?1 AND value = ?2"
        );
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![category.as_str(), value],
              RawCatalogEntry::from_row,
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawCatalogEntry::into_entry).transpose()
  }

  async fn max_catalog_order(&self, category: TagCategory) -> Result<Option<i64>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn.query_row(
            "SELECT MAX(sort_order) FROM metadata WHERE category = ?1",
            rusqlite::params![category.as_str()],
            |r| r.get::<_, Option<i64>>(0),
          )?)
        })
        .await?,
    )
  }

  async fn add_catalog_entry(
    &self,
    category: TagCategory,
    value: String,
    sort_order: i64,
  ) -> Result<CatalogEntry> {
    let entry = CatalogEntry {
      id: Uuid::new_v4(),
      category,
      value,
      sort_order,
      active: true,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(entry.id);
    let value = entry.value.clone();
    let at_str = encode_dt(entry.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO metadata (entry_id, category, value, sort_order, active, created_at)
           VALUES (?1, ?2, ?3, ?4, 1, ?5)",
          rusqlite::params![id_str, category.as_str(), value, sort_order, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(entry)
  }

  async fn rename_catalog_entry(&self, id: Uuid, value: String) -> Result<bool> {
    let n = self
      .execute(
        "UPDATE metadata SET value = ?1 WHERE entry_id = ?2",
        vec![text(value), text(encode_uuid(id))],
      )
      .await?;
    Ok(n > 0)
  }

  async fn set_catalog_order(&self, id: Uuid, sort_order: i64) -> Result<bool> {
    let n = self
      .execute(
        "UPDATE metadata SET sort_order = ?1 WHERE entry_id = ?2",
        vec![rusqlite::types::Value::Integer(sort_order), text(encode_uuid(id))],
      )
      .await?;
    Ok(n > 0)
  }

  async fn delete_catalog_entry(&self, id: Uuid) -> Result<bool> {
    let n = self
      .execute("DELETE FROM metadata WHERE entry_id = ?1", vec![text(encode_uuid(id))])
      .await?;
    Ok(n > 0)
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  async fn stats(&self) -> Result<DashboardStats> {
    let counts: [i64; 5] = self
      .conn
      .call(|conn| {
        let count = |sql: &str| conn.query_row(sql, [], |r| r.get::<_, i64>(0));
        Ok([
          count("SELECT COUNT(*) FROM customers")?,
          count("SELECT COUNT(*) FROM customers WHERE status = 'Active'")?,
          count("SELECT COUNT(*) FROM publications")?,
          count("SELECT COUNT(*) FROM publications WHERE status = 'Distributed'")?,
          count("SELECT COUNT(*) FROM distribution_logs")?,
        ])
      })
      .await?;
    let [total_customers, active_customers, total_publications, distributed_publications, total_logs] =
      counts.map(|n| u64::try_from(n).unwrap_or_default());
    Ok(DashboardStats {
      total_customers,
      active_customers,
      total_publications,
      distributed_publications,
      total_logs,
    })
  }
}
