//! One user session: schedule, roster and selection state together.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::api::ApiClient;
use crate::backend::ScheduleBackend;
use crate::config::Config;
use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{BranchColors, Event, EventCandidate, EventChanges, EventIdentity, MemberId};
use crate::roster::MemberRoster;
use crate::schedule::{
    rows, Confirmation, DateDisplay, EventFilter, EventRow, EventSortColumn, ScheduleStore,
};
use crate::selection::{Dialog, SelectionAction, SelectionState};

/// What the active dialog submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogSubmission {
    NewEvent(EventCandidate),
    EditEvent(EventChanges),
    Attendance(BTreeSet<MemberId>),
}

pub struct Workspace {
    pub schedule: ScheduleStore,
    pub roster: MemberRoster,
    pub selection: SelectionState,
}

impl Workspace {
    pub fn new(backend: Arc<dyn ScheduleBackend>) -> Self {
        Self {
            schedule: ScheduleStore::new(backend.clone()),
            roster: MemberRoster::new(backend),
            selection: SelectionState::new(),
        }
    }

    /// Workspace backed by the HTTP store named in `config`.
    pub fn connect(config: &Config) -> ScheduleResult<Self> {
        let client = ApiClient::from_config(config)?;
        debug!(base_url = client.base_url(), "Connecting to schedule store");
        Ok(Self::new(Arc::new(client)))
    }

    /// Load schedule and roster concurrently.
    pub async fn open(&self) -> ScheduleResult<()> {
        futures::try_join!(self.schedule.load(), self.roster.list())?;
        Ok(())
    }

    /// Record attendance against the session roster.
    pub async fn record_attendance(
        &self,
        identity: &EventIdentity,
        present: &BTreeSet<MemberId>,
    ) -> ScheduleResult<Vec<Event>> {
        let roster = self.roster.list().await?;
        self.schedule.submit_attendance(identity, present, &roster).await
    }

    /// Remove an event and collapse its row if it was expanded.
    pub async fn remove_event(
        &mut self,
        identity: &EventIdentity,
        confirmation: Confirmation,
    ) -> ScheduleResult<Vec<Event>> {
        let events = self.schedule.remove(identity, confirmation).await?;
        self.selection
            .apply(SelectionAction::DeleteConfirmed(identity.clone()));
        Ok(events)
    }

    /// Submit the active dialog. The target is resolved by identity when the
    /// submit runs; a target removed meanwhile fails with `NotFound` and the
    /// dialog stays open.
    pub async fn submit_dialog(
        &mut self,
        submission: DialogSubmission,
    ) -> ScheduleResult<Vec<Event>> {
        let baseline = self.schedule.events().await;
        if let Some(target) = self.selection.resolve_target(&baseline)? {
            debug!(event = %target.identity(), "Submitting dialog");
        }

        let (events, identity) = match (self.selection.dialog().clone(), submission) {
            (Dialog::NewEvent, DialogSubmission::NewEvent(candidate)) => {
                let identity = candidate.validate()?.identity();
                (self.schedule.create(&candidate).await?, identity)
            }
            (Dialog::EditEvent(target), DialogSubmission::EditEvent(changes)) => {
                let identity = changes.resulting_identity(&target)?;
                (self.schedule.update(&target, &changes).await?, identity)
            }
            (Dialog::Attendance(target), DialogSubmission::Attendance(present)) => {
                (self.record_attendance(&target, &present).await?, target)
            }
            _ => return Err(ScheduleError::NoActiveDialog),
        };

        self.selection.apply(SelectionAction::SubmitSucceeded {
            identity: Some(identity),
        });
        self.selection.retain_existing(&events);
        Ok(events)
    }

    /// Rows for the current baseline and selection.
    pub async fn rows(
        &self,
        filter: &EventFilter,
        sort: Option<(EventSortColumn, bool)>,
    ) -> Vec<OwnedRow> {
        let events = self.schedule.events().await;
        rows(&events, filter, sort, &self.selection)
            .into_iter()
            .map(OwnedRow::from)
            .collect()
    }
}

/// `EventRow` detached from the store's collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedRow {
    pub event: Event,
    pub date_label: String,
    pub highlighted: bool,
    pub expanded: bool,
    pub colors: Option<BranchColors>,
    pub date_display: DateDisplay,
}

impl From<EventRow<'_>> for OwnedRow {
    fn from(row: EventRow<'_>) -> Self {
        Self {
            event: row.event.clone(),
            date_label: row.date_label,
            highlighted: row.highlighted,
            expanded: row.expanded,
            colors: row.colors,
            date_display: row.date_display,
        }
    }
}
