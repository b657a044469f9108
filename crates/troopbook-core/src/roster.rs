//! Member roster, fetched once per session and served from memory after.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::backend::ScheduleBackend;
use crate::cache::CachedData;
use crate::error::ScheduleResult;
use crate::models::Member;

#[derive(Default)]
struct RosterState {
    cached: Option<CachedData<Vec<Member>>>,
    /// Bumped whenever a fetch result is applied, success or failure.
    generation: u64,
}

impl RosterState {
    fn members(&self) -> Vec<Member> {
        self.cached
            .as_ref()
            .map(|cached| cached.data.clone())
            .unwrap_or_default()
    }
}

pub struct MemberRoster {
    backend: Arc<dyn ScheduleBackend>,
    state: RwLock<RosterState>,
}

impl MemberRoster {
    pub fn new(backend: Arc<dyn ScheduleBackend>) -> Self {
        Self {
            backend,
            state: RwLock::new(RosterState::default()),
        }
    }

    /// The roster, fetched on first use and cached for the session.
    pub async fn list(&self) -> ScheduleResult<Vec<Member>> {
        if let Some(ref cached) = self.state.read().await.cached {
            return Ok(cached.data.clone());
        }
        self.refresh().await
    }

    /// Re-fetch the roster. On failure the cached roster is dropped, so the
    /// caller sees an empty roster alongside the error.
    ///
    /// A response that arrives after a later fetch was applied is stale: it
    /// is not cached and the current roster is returned instead.
    pub async fn refresh(&self) -> ScheduleResult<Vec<Member>> {
        let requested_at = self.state.read().await.generation;
        let result = self.backend.fetch_members().await;

        let mut state = self.state.write().await;
        if state.generation != requested_at {
            warn!(
                requested_at,
                current = state.generation,
                "Discarding stale roster response"
            );
            let current = state.members();
            return result.map(|_| current).map_err(Into::into);
        }
        state.generation = state.generation.wrapping_add(1);

        match result {
            Ok(members) => {
                debug!(count = members.len(), "Roster loaded");
                state.cached = Some(CachedData::new(members.clone()));
                Ok(members)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load roster");
                state.cached = None;
                Err(e.into())
            }
        }
    }

    /// Cached members, empty when the roster has not loaded.
    pub async fn members(&self) -> Vec<Member> {
        self.state.read().await.members()
    }

    /// How long ago the roster was fetched, for status display.
    pub async fn age_display(&self) -> Option<String> {
        self.state.read().await.cached.as_ref().map(CachedData::age_display)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::api::ApiError;
    use crate::error::ScheduleError;
    use crate::models::{Event, EventIdentity};

    /// Counts member fetches and fails them on demand.
    #[derive(Default)]
    struct CountingBackend {
        fetches: AtomicUsize,
        fail: AtomicBool,
    }

    #[async_trait]
    impl ScheduleBackend for CountingBackend {
        async fn fetch_schedule(&self) -> Result<Vec<Event>, ApiError> {
            Ok(Vec::new())
        }

        async fn save_schedule(&self, events: &[Event]) -> Result<Vec<Event>, ApiError> {
            Ok(events.to_vec())
        }

        async fn remove_event(&self, identity: &EventIdentity) -> Result<Vec<Event>, ApiError> {
            Err(ApiError::NotFound(identity.to_string()))
        }

        async fn fetch_members(&self) -> Result<Vec<Member>, ApiError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Remote("members table unavailable".to_string()));
            }
            Ok(vec![Member::new("alice", "Alice"), Member::new("bob", "Bob")])
        }
    }

    #[tokio::test]
    async fn test_list_fetches_once() {
        let backend = Arc::new(CountingBackend::default());
        let roster = MemberRoster::new(backend.clone());

        assert_eq!(roster.list().await.unwrap().len(), 2);
        assert_eq!(roster.list().await.unwrap().len(), 2);
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(roster.age_display().await.as_deref(), Some("just now"));
    }

    #[tokio::test]
    async fn test_failure_surfaces_error_and_empty_roster() {
        let backend = Arc::new(CountingBackend::default());
        backend.fail.store(true, Ordering::SeqCst);
        let roster = MemberRoster::new(backend.clone());

        let err = roster.list().await.unwrap_err();
        assert!(matches!(err, ScheduleError::Transport(ApiError::Remote(_))));
        assert!(roster.members().await.is_empty());
        assert!(roster.age_display().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_drops_cached_roster() {
        let backend = Arc::new(CountingBackend::default());
        let roster = MemberRoster::new(backend.clone());
        roster.list().await.unwrap();

        backend.fail.store(true, Ordering::SeqCst);
        assert!(roster.refresh().await.is_err());
        assert!(roster.members().await.is_empty());

        // next list() tries again
        backend.fail.store(false, Ordering::SeqCst);
        assert_eq!(roster.list().await.unwrap().len(), 2);
        assert_eq!(backend.fetches.load(Ordering::SeqCst), 3);
    }

    /// Holds the first member fetch until released and answers it with an
    /// older roster. Later fetches answer immediately.
    struct GatedBackend {
        gated: AtomicBool,
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl ScheduleBackend for GatedBackend {
        async fn fetch_schedule(&self) -> Result<Vec<Event>, ApiError> {
            Ok(Vec::new())
        }

        async fn save_schedule(&self, events: &[Event]) -> Result<Vec<Event>, ApiError> {
            Ok(events.to_vec())
        }

        async fn remove_event(&self, identity: &EventIdentity) -> Result<Vec<Event>, ApiError> {
            Err(ApiError::NotFound(identity.to_string()))
        }

        async fn fetch_members(&self) -> Result<Vec<Member>, ApiError> {
            if self.gated.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
                return Ok(vec![Member::new("old", "Old")]);
            }
            Ok(vec![Member::new("new", "New")])
        }
    }

    #[tokio::test]
    async fn test_stale_refresh_does_not_overwrite_newer_roster() {
        let backend = Arc::new(GatedBackend {
            gated: AtomicBool::new(true),
            entered: Notify::new(),
            release: Notify::new(),
        });
        let roster = Arc::new(MemberRoster::new(backend.clone()));

        let first = {
            let roster = roster.clone();
            tokio::spawn(async move { roster.refresh().await })
        };
        backend.entered.notified().await;

        let newer = roster.refresh().await.unwrap();
        assert_eq!(newer, vec![Member::new("new", "New")]);
        backend.release.notify_one();

        let stale = first.await.unwrap().unwrap();
        assert_eq!(stale, vec![Member::new("new", "New")]);
        assert_eq!(roster.members().await, vec![Member::new("new", "New")]);
    }
}
