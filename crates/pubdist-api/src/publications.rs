//! Handlers for `/publications` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/publications` | Optional `search`, `status`, `urgency` |
//! | `POST`   | `/publications` | Body: [`NewPublication`]; returns 201 + a `Draft` |
//! | `GET`    | `/publications/:id` | Single publication |
//! | `PUT`    | `/publications/:id` | Body: [`NewPublication`]; status is untouched |
//! | `DELETE` | `/publications/:id` | 204 |
//! | `POST`   | `/publications/:id/approve` | 202; distribution runs in the background |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use pubdist_core::{
  publication::{NewPublication, Publication},
  store::{DistributionStore, PublicationQuery},
  transport::MailTransport,
};
use pubdist_engine::Distributor;
use tracing::{error, info};
use uuid::Uuid;

use crate::{error::ApiError, require};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /publications[?search=...][&status=Draft][&urgency=High]`
pub async fn list<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Query(query): Query<PublicationQuery>,
) -> Result<Json<Vec<Publication>>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let publications = distributor
    .store()
    .list_publications(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(publications))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /publications/:id`
pub async fn get_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Publication>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let publication = distributor
    .store()
    .get_publication(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("publication {id} not found")))?;
  Ok(Json(publication))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /publications`: returns 201 + the stored `Draft`.
pub async fn create<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Json(body): Json<NewPublication>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  validate(&body)?;
  let publication = distributor
    .store()
    .add_publication(body)
    .await
    .map_err(ApiError::store)?;
  info!(id = %publication.id, number = %publication.number, "publication added");
  Ok((StatusCode::CREATED, Json(publication)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /publications/:id`
pub async fn update_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewPublication>,
) -> Result<Json<Publication>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  validate(&body)?;
  let publication = distributor
    .store()
    .update_publication(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("publication {id} not found")))?;
  info!(%id, "publication updated");
  Ok(Json(publication))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /publications/:id`
pub async fn delete_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let deleted = distributor
    .store()
    .delete_publication(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("publication {id} not found")))?;
  info!(%id, number = %deleted.number, "publication deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Approve ──────────────────────────────────────────────────────────────────

/// `POST /publications/:id/approve`
///
/// Answers as soon as the status is `Approved`; the distribution run
/// continues on its own task and reports through the log.
pub async fn approve_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let publication = distributor.approve(id).await?;

  let runner = distributor.clone();
  tokio::spawn(async move {
    if let Err(e) = runner.distribute(id).await {
      error!(publication_id = %id, error = %e, "distribution failed");
    }
  });

  Ok((StatusCode::ACCEPTED, Json(publication)))
}

fn validate(body: &NewPublication) -> Result<(), ApiError> {
  require(&[("title", body.title.as_str()), ("number", body.number.as_str())])
}
