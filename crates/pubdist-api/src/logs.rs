//! Handlers for `/logs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/logs` | Optional `search`, `urgency`; newest first |
//! | `GET`  | `/logs/:id` | Single entry |
//! | `POST` | `/logs/:id/resend` | Returns the new `Resent` entry |
//! | `POST` | `/logs/resend-bulk` | Body: `{"ids":[...]}`; returns `{"success":true,"count":n}` |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use pubdist_core::{
  log::LogEntry,
  store::{DistributionStore, LogQuery},
  transport::MailTransport,
};
use pubdist_engine::Distributor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /logs[?search=...][&urgency=High]`
pub async fn list<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Query(query): Query<LogQuery>,
) -> Result<Json<Vec<LogEntry>>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let logs = distributor
    .store()
    .list_logs(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(logs))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /logs/:id`
pub async fn get_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
) -> Result<Json<LogEntry>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let entry = distributor
    .store()
    .get_log(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("log entry {id} not found")))?;
  Ok(Json(entry))
}

// ─── Resend ───────────────────────────────────────────────────────────────────

/// `POST /logs/:id/resend`
pub async fn resend_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
) -> Result<Json<LogEntry>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  Ok(Json(distributor.resend(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct BulkResendBody {
  #[serde(default)]
  pub ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchReply {
  pub success: bool,
  pub count:   u32,
}

/// `POST /logs/resend-bulk`: entries that cannot be resent are skipped.
pub async fn resend_bulk<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Json(body): Json<BulkResendBody>,
) -> Result<Json<BatchReply>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let count = distributor.resend_bulk(&body.ids).await?;
  Ok(Json(BatchReply { success: true, count }))
}
