//! Handlers for `/metadata` endpoints (the tag vocabulary catalog).
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/metadata` | Every entry, active or not |
//! | `POST`   | `/metadata` | Body: `{"category":"market","value":"Rail"}`; 201 |
//! | `PUT`    | `/metadata/:id` | Body: `{"value":"..."}` |
//! | `DELETE` | `/metadata/:id` | 204 |
//! | `POST`   | `/metadata/:id/move` | Body: `{"direction":"up"}`; 204 |
//! | `POST`   | `/metadata/reorder` | Body: `{"ids":[...]}`; returns `{"success":true,"count":n}` |
//! | `GET`    | `/metadata/active` | Public; active values grouped per category |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use pubdist_core::{
  catalog::{CatalogEntry, MoveDirection, Vocabulary},
  store::DistributionStore,
  tags::TagCategory,
  transport::MailTransport,
};
use pubdist_engine::{Distributor, catalog};
use serde::Deserialize;
use uuid::Uuid;

use crate::{error::ApiError, logs::BatchReply};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /metadata`
pub async fn list<S, T>(
  State(distributor): State<Distributor<S, T>>,
) -> Result<Json<Vec<CatalogEntry>>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let entries = distributor
    .store()
    .list_catalog(false)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(entries))
}

/// `GET /metadata/active`
pub async fn active<S, T>(
  State(distributor): State<Distributor<S, T>>,
) -> Result<Json<Vocabulary>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  Ok(Json(catalog::vocabulary(distributor.store().as_ref()).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewEntryBody {
  pub category: TagCategory,
  pub value:    String,
}

/// `POST /metadata`
pub async fn create<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Json(body): Json<NewEntryBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let entry = catalog::add_entry(distributor.store().as_ref(), body.category, &body.value).await?;
  Ok((StatusCode::CREATED, Json(entry)))
}

// ─── Rename ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenameBody {
  pub value: String,
}

/// `PUT /metadata/:id`
pub async fn update_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RenameBody>,
) -> Result<Json<CatalogEntry>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  Ok(Json(catalog::rename_entry(distributor.store().as_ref(), id, &body.value).await?))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /metadata/:id`
pub async fn delete_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  catalog::delete_entry(distributor.store().as_ref(), id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Ordering ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MoveBody {
  pub direction: MoveDirection,
}

/// `POST /metadata/:id/move`
pub async fn move_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
  Json(body): Json<MoveBody>,
) -> Result<StatusCode, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  catalog::move_entry(distributor.store().as_ref(), id, body.direction).await?;
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ReorderBody {
  #[serde(default)]
  pub ids: Vec<Uuid>,
}

/// `POST /metadata/reorder`: ids take the sort order of their position.
pub async fn reorder<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Json(body): Json<ReorderBody>,
) -> Result<Json<BatchReply>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let count = catalog::reorder(distributor.store().as_ref(), &body.ids).await?;
  Ok(Json(BatchReply { success: true, count }))
}
