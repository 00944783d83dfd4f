//! Unauthenticated self-service endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/subscribe` | Body: [`SubscribeForm`]; 201 when new, 200 when reactivated |
//! | `GET`  | `/unsubscribe` | `?email=...`; nothing changes until `&confirmed=true` |

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use pubdist_core::{store::DistributionStore, transport::MailTransport};
use pubdist_engine::{
  Distributor,
  subscription::{self, SubscribeForm, SubscribeOutcome},
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// ─── Subscribe ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SubscribeReply {
  pub message: &'static str,
  #[serde(flatten)]
  pub outcome: SubscribeOutcome,
}

/// `POST /subscribe`
pub async fn subscribe<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Json(form): Json<SubscribeForm>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let outcome = subscription::subscribe(distributor.store().as_ref(), form).await?;
  let status = match outcome {
    SubscribeOutcome::Created(_) => StatusCode::CREATED,
    SubscribeOutcome::Reactivated(_) => StatusCode::OK,
  };
  Ok((status, Json(SubscribeReply { message: outcome.message(), outcome })))
}

// ─── Unsubscribe ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UnsubscribeParams {
  #[serde(default)]
  pub email:     String,
  /// Only `true` performs the change; anything else asks for confirmation.
  #[serde(default)]
  pub confirmed: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnsubscribeReply {
  pub email:        String,
  pub unsubscribed: bool,
  pub message:      String,
}

/// `GET /unsubscribe?email=...[&confirmed=true]`
pub async fn unsubscribe<S, T>(
  State(distributor): State<Distributor<S, T>>,
  Query(params): Query<UnsubscribeParams>,
) -> Result<Json<UnsubscribeReply>, ApiError>
where
  S: DistributionStore + 'static,
  T: MailTransport + 'static,
{
  let email = params.email.trim().to_owned();
  if email.is_empty() {
    return Err(ApiError::BadRequest("email is required".into()));
  }

  if params.confirmed.as_deref() != Some("true") {
    return Ok(Json(UnsubscribeReply {
      message: format!(
        "You are requesting to unsubscribe {email} from publication notifications. \
         Repeat the request with confirmed=true to proceed."
      ),
      email,
      unsubscribed: false,
    }));
  }

  subscription::unsubscribe(distributor.store().as_ref(), &email).await?;
  Ok(Json(UnsubscribeReply {
    email,
    unsubscribed: true,
    message: "You have been unsubscribed. You will no longer receive publication notifications."
      .into(),
  }))
}
