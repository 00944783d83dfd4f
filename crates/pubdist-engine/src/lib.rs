//! Distribution workflows over a [`DistributionStore`] and a
//! [`MailTransport`].
//!
//! - [`dispatch`]: compose and send one notification, never failing the caller.
//! - [`recorder`]: append one snapshot row to the distribution log.
//! - [`distribution`]: approval and the distribution run.
//! - [`resend`]: single and bulk resend from log entries.
//! - [`subscription`]: public subscribe and unsubscribe.
//! - [`catalog`]: metadata vocabulary administration.
//!
//! [`DistributionStore`]: pubdist_core::store::DistributionStore
//! [`MailTransport`]: pubdist_core::transport::MailTransport

pub mod catalog;
pub mod dispatch;
pub mod distribution;
pub mod error;
pub mod recorder;
pub mod resend;
pub mod subscription;

pub use dispatch::{DispatchOutcome, Notifier};
pub use distribution::{DistributionSummary, Distributor};
pub use error::{Error, Result};

#[cfg(test)]
mod testing;
