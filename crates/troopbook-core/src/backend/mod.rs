//! The persistence collaborator contract.
//!
//! The remote store accepts and returns the whole event list at once; there
//! are no partial-event updates. `ApiClient` speaks this contract over HTTP
//! and `MemoryBackend` keeps it in process.

pub mod memory;

use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::{Event, EventIdentity, Member};

pub use memory::MemoryBackend;

#[async_trait]
pub trait ScheduleBackend: Send + Sync {
    /// Fetch the full event collection.
    async fn fetch_schedule(&self) -> Result<Vec<Event>, ApiError>;

    /// Replace the stored collection, returning what the store now holds.
    async fn save_schedule(&self, events: &[Event]) -> Result<Vec<Event>, ApiError>;

    /// Delete one event by identity, returning the remaining collection.
    async fn remove_event(&self, identity: &EventIdentity) -> Result<Vec<Event>, ApiError>;

    /// Fetch the member roster.
    async fn fetch_members(&self) -> Result<Vec<Member>, ApiError>;
}
