use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::ScheduleBackend;
use crate::api::ApiError;
use crate::models::{Event, EventIdentity, Member};

/// In-process store honouring the same whole-collection contract as the
/// remote one.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    events: RwLock<Vec<Event>>,
    members: RwLock<Vec<Member>>,
}

impl MemoryBackend {
    pub fn new(events: Vec<Event>, members: Vec<Member>) -> Self {
        Self {
            events: RwLock::new(events),
            members: RwLock::new(members),
        }
    }

    pub fn with_members(members: Vec<Member>) -> Self {
        Self::new(Vec::new(), members)
    }

    /// Current stored collection.
    pub async fn snapshot(&self) -> Vec<Event> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl ScheduleBackend for MemoryBackend {
    async fn fetch_schedule(&self) -> Result<Vec<Event>, ApiError> {
        Ok(self.events.read().await.clone())
    }

    async fn save_schedule(&self, events: &[Event]) -> Result<Vec<Event>, ApiError> {
        let mut stored = self.events.write().await;
        *stored = events.to_vec();
        debug!(count = stored.len(), "Saved schedule in memory");
        Ok(stored.clone())
    }

    async fn remove_event(&self, identity: &EventIdentity) -> Result<Vec<Event>, ApiError> {
        let mut stored = self.events.write().await;
        let before = stored.len();
        stored.retain(|event| !event.has_identity(identity));
        if stored.len() == before {
            return Err(ApiError::NotFound(identity.to_string()));
        }
        Ok(stored.clone())
    }

    async fn fetch_members(&self) -> Result<Vec<Member>, ApiError> {
        Ok(self.members.read().await.clone())
    }
}
