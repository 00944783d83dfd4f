//! Handlers for `/customers` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/customers` | Optional `search`, `status`, `tier` |
//! | `POST`   | `/customers` | Body: [`NewCustomer`]; returns 201 + stored customer |
//! | `GET`    | `/customers/:id` | Single customer |
//! | `PUT`    | `/customers/:id` | Body: [`NewCustomer`]; replaces the profile |
//! | `DELETE` | `/customers/:id` | 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use pubdist_core::{
  customer::{Customer, NewCustomer},
  store::{CustomerQuery, DistributionStore},
  transport::MailTransport,
};
use pubdist_engine::Distributor;
use tracing::info;
use uuid::Uuid;

use crate::{error::ApiError, require};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /customers[?search=...][&status=Active][&tier=Standard]`
pub async fn list<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Query(query): Query<CustomerQuery>,
) -> Result<Json<Vec<Customer>>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let customers = distributor
    .store()
    .list_customers(&query)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(customers))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /customers/:id`
pub async fn get_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Customer>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let customer = distributor
    .store()
    .get_customer(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;
  Ok(Json(customer))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /customers`: returns 201 + the stored [`Customer`].
pub async fn create<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Json(body): Json<NewCustomer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  validate(&body)?;
  let customer = distributor
    .store()
    .add_customer(body)
    .await
    .map_err(ApiError::store)?;
  info!(id = %customer.id, email = %customer.email, "customer added");
  Ok((StatusCode::CREATED, Json(customer)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /customers/:id`: body is the full replacement profile.
pub async fn update_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewCustomer>,
) -> Result<Json<Customer>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  validate(&body)?;
  let customer = distributor
    .store()
    .update_customer(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("customer {id} not found")))?;
  info!(%id, "customer updated");
  Ok(Json(customer))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /customers/:id`: the distribution log keeps its snapshots.
pub async fn delete_one<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  if !distributor
    .store()
    .delete_customer(id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(ApiError::NotFound(format!("customer {id} not found")));
  }
  info!(%id, "customer deleted");
  Ok(StatusCode::NO_CONTENT)
}

fn validate(body: &NewCustomer) -> Result<(), ApiError> {
  require(&[
    ("contact_name", body.contact_name.as_str()),
    ("company", body.company.as_str()),
    ("email", body.email.as_str()),
  ])
}
