//! HTTP client for the remote schedule store.
//!
//! The store exposes whole-collection endpoints for the schedule and a
//! read-only member list. Every response body is an `Envelope` carrying
//! either `data` or `error`.

pub mod client;
pub mod envelope;
pub mod error;

pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::ApiError;
