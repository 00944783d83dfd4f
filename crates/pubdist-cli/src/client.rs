//! Async HTTP client wrapping the pubdist admin API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use pubdist_core::{
  customer::Customer,
  log::LogEntry,
  publication::Publication,
  store::DashboardStats,
};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

/// Connection settings for the pubdist API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Reply to batch operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchReply {
  pub success: bool,
  pub count:   u32,
}

/// Async HTTP client for the pubdist JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String { api_url(&self.config.base_url, path) }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  async fn get<T: serde::de::DeserializeOwned>(
    &self,
    path: &str,
    search: Option<&str>,
  ) -> Result<T> {
    debug!(path, ?search, "GET");
    let mut req = self.auth(self.client.get(self.url(path)));
    if let Some(search) = search {
      req = req.query(&[("search", search)]);
    }
    let resp = req.send().await.with_context(|| format!("GET {path} failed"))?;
    ensure_success(resp, "GET", path)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising GET {path}"))
  }

  async fn post<T: serde::de::DeserializeOwned>(
    &self,
    path: &str,
    body: Option<serde_json::Value>,
  ) -> Result<T> {
    debug!(path, "POST");
    let mut req = self.auth(self.client.post(self.url(path)));
    if let Some(body) = body {
      req = req.json(&body);
    }
    let resp = req.send().await.with_context(|| format!("POST {path} failed"))?;
    ensure_success(resp, "POST", path)
      .await?
      .json()
      .await
      .with_context(|| format!("deserialising POST {path}"))
  }

  // ── Dashboard ─────────────────────────────────────────────────────────────

  /// `GET /api/stats`
  pub async fn stats(&self) -> Result<DashboardStats> { self.get("/stats", None).await }

  // ── Records ───────────────────────────────────────────────────────────────

  /// `GET /api/customers[?search=...]`
  pub async fn customers(&self, search: Option<&str>) -> Result<Vec<Customer>> {
    self.get("/customers", search).await
  }

  /// `GET /api/publications[?search=...]`
  pub async fn publications(&self, search: Option<&str>) -> Result<Vec<Publication>> {
    self.get("/publications", search).await
  }

  /// `POST /api/publications/:id/approve`: distribution continues on the
  /// server after this returns.
  pub async fn approve(&self, id: Uuid) -> Result<Publication> {
    self.post(&format!("/publications/{id}/approve"), None).await
  }

  // ── Distribution log ──────────────────────────────────────────────────────

  /// `GET /api/logs[?search=...]`
  pub async fn logs(&self, search: Option<&str>) -> Result<Vec<LogEntry>> {
    self.get("/logs", search).await
  }

  /// `POST /api/logs/:id/resend`
  pub async fn resend(&self, id: Uuid) -> Result<LogEntry> {
    self.post(&format!("/logs/{id}/resend"), None).await
  }

  /// `POST /api/logs/resend-bulk`
  pub async fn resend_bulk(&self, ids: &[Uuid]) -> Result<BatchReply> {
    self.post("/logs/resend-bulk", Some(json!({ "ids": ids }))).await
  }
}

fn api_url(base_url: &str, path: &str) -> String {
  format!("{}/api{}", base_url.trim_end_matches('/'), path)
}

/// Turn a non-2xx reply into an error carrying the server's message.
async fn ensure_success(resp: Response, method: &str, path: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let message = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_owned))
    .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_owned());
  Err(anyhow!("{method} {path} → {status}: {message}"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn api_url_joins_without_double_slash() {
    assert_eq!(api_url("http://localhost:3000/", "/stats"), "http://localhost:3000/api/stats");
    assert_eq!(api_url("https://pubs.example.com", "/logs"), "https://pubs.example.com/api/logs");
  }
}
