use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::backend::ScheduleBackend;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::event::find_duplicate;
use crate::models::{attendance, Event, EventCandidate, EventChanges, EventIdentity, Member, MemberId};

/// Caller-supplied confirmation for destructive operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Unconfirmed,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Unconfirmed
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    events: Vec<Event>,
    /// Bumped every time a new collection is installed.
    revision: u64,
    /// Whether `events` came from the store. Until then it is not a
    /// baseline and must not be written back.
    loaded: bool,
}

impl StoreState {
    fn position(&self, identity: &EventIdentity) -> Option<usize> {
        self.events.iter().position(|e| e.has_identity(identity))
    }

    fn require(&self, identity: &EventIdentity) -> ScheduleResult<usize> {
        self.position(identity)
            .ok_or_else(|| ScheduleError::NotFound(identity.clone()))
    }

    fn install(&mut self, events: Vec<Event>) {
        self.events = events;
        self.revision = self.revision.wrapping_add(1);
        self.loaded = true;
    }
}

/// The session's view of the schedule.
///
/// Mutations hold the state lock across the store round trip, so they apply
/// one at a time and each returned collection becomes the baseline for the
/// next. A mutation on a store that has never loaded fetches the schedule
/// first, under the same lock. `load` releases the lock while waiting on the
/// network; a load that finishes after a mutation committed is stale and is
/// dropped.
pub struct ScheduleStore {
    backend: Arc<dyn ScheduleBackend>,
    state: Mutex<StoreState>,
}

impl ScheduleStore {
    pub fn new(backend: Arc<dyn ScheduleBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Fetch the schedule from the store and make it the baseline.
    pub async fn load(&self) -> ScheduleResult<Vec<Event>> {
        let requested_at = self.state.lock().await.revision;
        debug!(revision = requested_at, "Fetching schedule");

        let events = self.backend.fetch_schedule().await?;
        ensure_unique(&events)?;

        let mut state = self.state.lock().await;
        if state.revision != requested_at {
            warn!(
                requested_at,
                current = state.revision,
                "Discarding stale schedule response"
            );
            return Ok(state.events.clone());
        }
        state.install(events);
        info!(count = state.events.len(), "Schedule loaded");
        Ok(state.events.clone())
    }

    /// Current baseline.
    pub async fn events(&self) -> Vec<Event> {
        self.state.lock().await.events.clone()
    }

    pub async fn find(&self, identity: &EventIdentity) -> Option<Event> {
        let state = self.state.lock().await;
        state.position(identity).map(|i| state.events[i].clone())
    }

    pub async fn revision(&self) -> u64 {
        self.state.lock().await.revision
    }

    /// Validate and append a new event.
    pub async fn create(&self, candidate: &EventCandidate) -> ScheduleResult<Vec<Event>> {
        let event = candidate.validate()?;
        let identity = event.identity();

        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        if state.position(&identity).is_some() {
            warn!(event = %identity, "Rejected duplicate event");
            return Err(ScheduleError::DuplicateIdentity(identity));
        }

        let mut next = state.events.clone();
        next.push(event);
        let events = self.persist(&mut state, next).await?;
        info!(event = %identity, "Event created");
        Ok(events)
    }

    /// Apply `changes` to the event identified by `identity`, keeping its
    /// position in the collection.
    pub async fn update(
        &self,
        identity: &EventIdentity,
        changes: &EventChanges,
    ) -> ScheduleResult<Vec<Event>> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        let index = state.require(identity)?;

        let updated = changes.apply_to(&state.events[index]).validate()?;
        let new_identity = updated.identity();
        if &new_identity != identity && state.position(&new_identity).is_some() {
            warn!(from = %identity, to = %new_identity, "Rejected rename onto existing event");
            return Err(ScheduleError::DuplicateIdentity(new_identity));
        }

        let mut next = state.events.clone();
        next[index] = updated;
        let events = self.persist(&mut state, next).await?;
        info!(event = %new_identity, "Event updated");
        Ok(events)
    }

    /// Remove an event. Refused unless the caller confirmed.
    pub async fn remove(
        &self,
        identity: &EventIdentity,
        confirmation: Confirmation,
    ) -> ScheduleResult<Vec<Event>> {
        if confirmation != Confirmation::Confirmed {
            return Err(ScheduleError::ConfirmationRequired(identity.clone()));
        }

        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        state.require(identity)?;

        let remaining = match self.backend.remove_event(identity).await {
            Err(ApiError::NotFound(_)) => {
                warn!(event = %identity, "Event already gone from the store");
                return Err(ScheduleError::NotFound(identity.clone()));
            }
            result => result?,
        };
        ensure_unique(&remaining)?;
        state.install(remaining);
        info!(event = %identity, "Event removed");
        Ok(state.events.clone())
    }

    /// Replace the attendance of the event identified by `identity` with
    /// `present`, checked against `roster`.
    pub async fn submit_attendance(
        &self,
        identity: &EventIdentity,
        present: &BTreeSet<MemberId>,
        roster: &[Member],
    ) -> ScheduleResult<Vec<Event>> {
        let mut state = self.state.lock().await;
        self.ensure_loaded(&mut state).await?;
        let index = state.require(identity)?;

        let updated = attendance::submit(&state.events[index], present, roster)?;
        let mut next = state.events.clone();
        next[index] = updated;
        let events = self.persist(&mut state, next).await?;
        info!(event = %identity, present = present.len(), "Attendance recorded");
        Ok(events)
    }

    async fn ensure_loaded(&self, state: &mut StoreState) -> ScheduleResult<()> {
        if state.loaded {
            return Ok(());
        }
        debug!("Schedule not loaded yet, fetching before mutation");
        let events = self.backend.fetch_schedule().await?;
        ensure_unique(&events)?;
        state.install(events);
        Ok(())
    }

    async fn persist(&self, state: &mut StoreState, next: Vec<Event>) -> ScheduleResult<Vec<Event>> {
        let saved = self.backend.save_schedule(&next).await?;
        ensure_unique(&saved)?;
        state.install(saved);
        Ok(state.events.clone())
    }
}

fn ensure_unique(events: &[Event]) -> ScheduleResult<()> {
    match find_duplicate(events) {
        Some(identity) => {
            warn!(event = %identity, "Store returned duplicate events");
            Err(ScheduleError::DuplicateIdentity(identity))
        }
        None => Ok(()),
    }
}
