//! Handler for `GET /stats`.

use axum::{Json, extract::State};
use pubdist_core::{
  store::{DashboardStats, DistributionStore},
  transport::MailTransport,
};
use pubdist_engine::Distributor;

use crate::error::ApiError;

/// `GET /stats`: dashboard counters.
pub async fn handler<S, T>(
  State(distributor): State<Distributor<S, T>>,
) -> Result<Json<DashboardStats>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let stats = distributor.store().stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}
