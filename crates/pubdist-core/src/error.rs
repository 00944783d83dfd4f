//! Error types for `pubdist-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown customer status: {0:?}")]
  UnknownCustomerStatus(String),

  #[error("unknown distribution status: {0:?}")]
  UnknownDistributionStatus(String),

  #[error("unknown delivery status: {0:?}")]
  UnknownDeliveryStatus(String),

  #[error("unknown metadata category: {0:?}")]
  UnknownCategory(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
