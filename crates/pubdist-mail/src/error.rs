//! Error types for notification composition and delivery.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid base url: {0}")]
  BaseUrl(#[from] url::ParseError),

  #[error("base url cannot carry a path: {0}")]
  CannotBeABase(String),

  #[error("invalid mail address: {0}")]
  Address(#[from] lettre::address::AddressError),

  #[error("could not build message: {0}")]
  Message(#[from] lettre::error::Error),

  #[error("invalid content type: {0}")]
  ContentType(String),

  #[error("smtp error: {0}")]
  Smtp(#[from] lettre::transport::smtp::Error),

  #[error("could not read attachment: {0}")]
  Attachment(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
