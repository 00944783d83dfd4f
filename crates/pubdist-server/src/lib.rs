//! HTTP server assembly for pubdist.
//!
//! Mounts the public self-service routes at the root, the admin JSON API
//! under `/api` behind HTTP Basic auth, and an unauthenticated `/health`.

pub mod auth;

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, middleware, routing::get};
use chrono::{SecondsFormat, Utc};
use pubdist_core::{store::DistributionStore, transport::MailTransport};
use pubdist_engine::{Distributor, distribution::DEFAULT_MAX_CONCURRENT_SENDS};
use pubdist_mail::SmtpConfig;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `PUBDIST__*` environment.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                 String,
  #[serde(default = "default_port")]
  pub port:                 u16,
  /// Public URL; unsubscribe links are built from it.
  #[serde(default = "default_base_url")]
  pub base_url:             String,
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  #[serde(default = "default_username")]
  pub auth_username:        String,
  pub auth_password_hash:   String,
  #[serde(default = "default_max_concurrent_sends")]
  pub max_concurrent_sends: usize,
  #[serde(default)]
  pub mail:                 MailConfig,
}

#[derive(Deserialize, Clone)]
pub struct MailConfig {
  #[serde(default = "default_from")]
  pub from:         String,
  #[serde(default = "default_brand")]
  pub brand:        String,
  #[serde(default = "default_organisation")]
  pub organisation: String,
  /// Absent means notifications are only logged.
  #[serde(default)]
  pub smtp:         Option<SmtpConfig>,
}

impl Default for MailConfig {
  fn default() -> Self {
    Self {
      from:         default_from(),
      brand:        default_brand(),
      organisation: default_organisation(),
      smtp:         None,
    }
  }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }
fn default_base_url() -> String { "http://localhost:3000".to_string() }
fn default_store_path() -> PathBuf { PathBuf::from("publications.db") }
fn default_username() -> String { "admin".to_string() }
fn default_max_concurrent_sends() -> usize { DEFAULT_MAX_CONCURRENT_SENDS }
fn default_from() -> String { "publications@psi.com".to_string() }
fn default_brand() -> String { "PSI".to_string() }
fn default_organisation() -> String { "Power Solutions International".to_string() }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn router<S, T>(distributor: Distributor<S, T>, auth: Arc<AuthConfig>) -> Router
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let admin = pubdist_api::api_router(distributor.clone())
    .route_layer(middleware::from_fn_with_state(auth, require_auth));

  Router::new()
    .route("/health", get(health))
    .merge(pubdist_api::public_router(distributor))
    .nest("/api", admin)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
  Json(json!({
    "status":    "ok",
    "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
  }))
}

// ─── Integration tests ────────────────────────────────────────────────────────
