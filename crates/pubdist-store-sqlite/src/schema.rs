//! SQL schema for the distribution store.
//!
//! Executed at connection startup. Every statement is idempotent so the
//! batch can run against an existing database.

/// Full schema DDL plus data fix-ups.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS customers (
    customer_id         TEXT PRIMARY KEY,
    contact_name        TEXT NOT NULL,
    company             TEXT NOT NULL,
    customer_number     TEXT NOT NULL DEFAULT '',
    email               TEXT NOT NULL,
    cc_emails           TEXT,
    products            TEXT NOT NULL DEFAULT '',   -- '; '-joined tag-set
    markets             TEXT NOT NULL DEFAULT '',
    content_types       TEXT NOT NULL DEFAULT '',
    regions             TEXT NOT NULL DEFAULT '',
    customer_type       TEXT,
    tier                TEXT NOT NULL,
    preferred_frequency TEXT NOT NULL DEFAULT 'Immediate',
    status              TEXT NOT NULL DEFAULT 'Active',  -- 'Active' | 'Inactive'
    created_at          TEXT NOT NULL,
    last_notified       TEXT
);

CREATE TABLE IF NOT EXISTS publications (
    publication_id   TEXT PRIMARY KEY,
    title            TEXT NOT NULL,
    number           TEXT NOT NULL,               -- not unique
    products         TEXT NOT NULL DEFAULT '',
    markets          TEXT NOT NULL DEFAULT '',
    content_type     TEXT NOT NULL DEFAULT '',
    regions          TEXT NOT NULL DEFAULT '',
    urgency          TEXT NOT NULL,
    summary          TEXT,
    action_required  TEXT,
    author_name      TEXT,
    reviewer         TEXT,
    status           TEXT NOT NULL DEFAULT 'Draft',
    published_at     TEXT,
    recipients_count INTEGER NOT NULL DEFAULT 0,
    attachment_path  TEXT,
    attachment_name  TEXT,
    created_at       TEXT NOT NULL
);

-- Snapshots only, no foreign keys.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS distribution_logs (
    log_id             TEXT PRIMARY KEY,
    publication_number TEXT NOT NULL,
    publication_title  TEXT NOT NULL,
    content_type       TEXT NOT NULL,
    urgency            TEXT NOT NULL,
    recipient_name     TEXT NOT NULL,
    recipient_company  TEXT NOT NULL,
    recipient_email    TEXT NOT NULL,
    sent_at            TEXT NOT NULL,
    delivery_status    TEXT NOT NULL,   -- 'Sent' | 'Resent'
    acknowledged       INTEGER NOT NULL DEFAULT 0,
    acknowledged_at    TEXT,
    match_reason       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS metadata (
    entry_id   TEXT PRIMARY KEY,
    category   TEXT NOT NULL,   -- 'product' | 'market' | 'content_type' | 'region'
    value      TEXT NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    active     INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    UNIQUE (category, value)
);

CREATE INDEX IF NOT EXISTS customers_email_idx    ON customers(email);
CREATE INDEX IF NOT EXISTS publications_num_idx   ON publications(number);
CREATE INDEX IF NOT EXISTS logs_sent_idx          ON distribution_logs(sent_at);
CREATE INDEX IF NOT EXISTS metadata_category_idx  ON metadata(category, sort_order);

-- Legacy tier label.
UPDATE customers SET tier = 'All Announcements' WHERE tier = 'Comprehensive';

PRAGMA user_version = 1;
";
