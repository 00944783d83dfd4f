//! JSON REST API for pubdist.
//!
//! Exposes axum [`Router`]s backed by a [`Distributor`] over any
//! [`DistributionStore`] and [`MailTransport`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! Router::new()
//!   .merge(pubdist_api::public_router(distributor.clone()))
//!   .nest("/api", pubdist_api::api_router(distributor).route_layer(auth))
//! ```

pub mod customers;
pub mod error;
pub mod logs;
pub mod metadata;
pub mod public;
pub mod publications;
pub mod stats;

use axum::{
  Router,
  routing::{get, post, put},
};
use pubdist_core::{store::DistributionStore, transport::MailTransport};
use pubdist_engine::Distributor;

pub use error::ApiError;

/// Build the admin API router. Paths are relative; nest it under `/api`.
pub fn api_router<S, T>(distributor: Distributor<S, T>) -> Router<()>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  Router::new()
    .route("/stats", get(stats::handler::<S, T>))
    // Customers
    .route("/customers", get(customers::list::<S, T>).post(customers::create::<S, T>))
    .route(
      "/customers/{id}",
      get(customers::get_one::<S, T>)
        .put(customers::update_one::<S, T>)
        .delete(customers::delete_one::<S, T>),
    )
    // Publications
    .route(
      "/publications",
      get(publications::list::<S, T>).post(publications::create::<S, T>),
    )
    .route(
      "/publications/{id}",
      get(publications::get_one::<S, T>)
        .put(publications::update_one::<S, T>)
        .delete(publications::delete_one::<S, T>),
    )
    .route("/publications/{id}/approve", post(publications::approve_one::<S, T>))
    // Distribution log
    .route("/logs", get(logs::list::<S, T>))
    .route("/logs/resend-bulk", post(logs::resend_bulk::<S, T>))
    .route("/logs/{id}", get(logs::get_one::<S, T>))
    .route("/logs/{id}/resend", post(logs::resend_one::<S, T>))
    // Metadata catalog
    .route("/metadata", get(metadata::list::<S, T>).post(metadata::create::<S, T>))
    .route("/metadata/reorder", post(metadata::reorder::<S, T>))
    .route(
      "/metadata/{id}",
      put(metadata::update_one::<S, T>).delete(metadata::delete_one::<S, T>),
    )
    .route("/metadata/{id}/move", post(metadata::move_one::<S, T>))
    .with_state(distributor)
}

/// Build the unauthenticated router with absolute paths.
pub fn public_router<S, T>(distributor: Distributor<S, T>) -> Router<()>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  Router::new()
    .route("/subscribe", post(public::subscribe::<S, T>))
    .route("/unsubscribe", get(public::unsubscribe::<S, T>))
    .route("/api/metadata/active", get(metadata::active::<S, T>))
    .with_state(distributor)
}

/// Reject the request if any named field is blank.
pub(crate) fn require(fields: &[(&str, &str)]) -> Result<(), ApiError> {
  let missing: Vec<&str> = fields
    .iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| *name)
    .collect();
  if missing.is_empty() {
    Ok(())
  } else {
    Err(ApiError::BadRequest(format!("{} required", missing.join(", "))))
  }
}
