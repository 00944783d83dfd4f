//! Core types and trait definitions for the publication distribution system.
//!
//! This crate is deliberately free of HTTP, mail and database dependencies.
//! It holds the domain records, the tag-set model, the recipient matching
//! rule, and the seams (`DistributionStore`, `MailTransport`) that the other
//! crates implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod customer;
pub mod error;
pub mod log;
pub mod matching;
pub mod publication;
pub mod store;
pub mod tags;
pub mod transport;

pub use error::{Error, Result};
