//! Which event is expanded and which dialog is open.
//!
//! Both are keyed by `EventIdentity`, never by list position, so a list that
//! changes underneath an open dialog cannot redirect it to another event.

use crate::error::{ScheduleError, ScheduleResult};
use crate::models::{Event, EventIdentity};

/// The single active dialog, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Dialog {
    #[default]
    None,
    NewEvent,
    EditEvent(EventIdentity),
    Attendance(EventIdentity),
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::None)
    }

    /// Event the dialog acts on. `NewEvent` has none.
    pub fn target(&self) -> Option<&EventIdentity> {
        match self {
            Dialog::EditEvent(identity) | Dialog::Attendance(identity) => Some(identity),
            Dialog::None | Dialog::NewEvent => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionAction {
    RowClicked(EventIdentity),
    AddClicked,
    EditClicked(EventIdentity),
    AttendanceClicked(EventIdentity),
    DeleteConfirmed(EventIdentity),
    DialogClosed,
    /// The active dialog's submit succeeded; `identity` is the event as it
    /// now exists (an edit may have renamed it).
    SubmitSucceeded { identity: Option<EventIdentity> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    expanded: Option<EventIdentity>,
    dialog: Dialog,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expanded(&self) -> Option<&EventIdentity> {
        self.expanded.as_ref()
    }

    pub fn is_expanded(&self, identity: &EventIdentity) -> bool {
        self.expanded.as_ref() == Some(identity)
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    /// Apply one UI action. Returns whether the state changed.
    ///
    /// Dialogs are modal: while one is open, row clicks and requests to open
    /// another dialog are ignored.
    pub fn apply(&mut self, action: SelectionAction) -> bool {
        let before = self.clone();
        match action {
            SelectionAction::RowClicked(identity) => {
                if !self.dialog.is_open() {
                    self.expanded = if self.is_expanded(&identity) {
                        None
                    } else {
                        Some(identity)
                    };
                }
            }
            SelectionAction::AddClicked => self.open(Dialog::NewEvent),
            SelectionAction::EditClicked(identity) => self.open(Dialog::EditEvent(identity)),
            SelectionAction::AttendanceClicked(identity) => {
                self.open(Dialog::Attendance(identity))
            }
            SelectionAction::DeleteConfirmed(identity) => {
                // An open dialog on this event stays; its submit will
                // resolve the identity and fail.
                if self.is_expanded(&identity) {
                    self.expanded = None;
                }
            }
            SelectionAction::DialogClosed => self.dialog = Dialog::None,
            SelectionAction::SubmitSucceeded { identity } => {
                if let (Dialog::EditEvent(old), Some(new)) = (&self.dialog, identity) {
                    if self.expanded.as_ref() == Some(old) {
                        self.expanded = Some(new);
                    }
                }
                self.dialog = Dialog::None;
            }
        }
        *self != before
    }

    fn open(&mut self, dialog: Dialog) {
        if !self.dialog.is_open() {
            self.dialog = dialog;
        }
    }

    /// Resolve the active dialog's target against `events`.
    ///
    /// `Ok(None)` for dialogs without a target, `NotFound` when the target
    /// is gone. There is no fallback to another event.
    pub fn resolve_target<'a>(&self, events: &'a [Event]) -> ScheduleResult<Option<&'a Event>> {
        match self.dialog.target() {
            None => Ok(None),
            Some(identity) => events
                .iter()
                .find(|e| e.has_identity(identity))
                .map(Some)
                .ok_or_else(|| ScheduleError::NotFound(identity.clone())),
        }
    }

    /// Collapse the expanded row if its event no longer exists.
    pub fn retain_existing(&mut self, events: &[Event]) {
        if let Some(ref identity) = self.expanded {
            if !events.iter().any(|e| e.has_identity(identity)) {
                self.expanded = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCandidate;

    fn id(name: &str) -> EventIdentity {
        EventIdentity::parse(name, "2022-10-01").unwrap()
    }

    fn event(name: &str) -> Event {
        EventCandidate::new(name, "2022-10-01").validate().unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = SelectionState::new();
        assert!(state.expanded().is_none());
        assert_eq!(*state.dialog(), Dialog::None);
    }

    #[test]
    fn test_row_click_toggles() {
        let mut state = SelectionState::new();
        assert!(state.apply(SelectionAction::RowClicked(id("A"))));
        assert!(state.is_expanded(&id("A")));
        assert!(state.apply(SelectionAction::RowClicked(id("A"))));
        assert!(state.expanded().is_none());
    }

    #[test]
    fn test_row_click_switches_expansion() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::RowClicked(id("A")));
        state.apply(SelectionAction::RowClicked(id("B")));
        assert_eq!(state.expanded(), Some(&id("B")));
        assert!(!state.is_expanded(&id("A")));
    }

    #[test]
    fn test_opening_dialog_keeps_expansion() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::RowClicked(id("A")));
        state.apply(SelectionAction::EditClicked(id("A")));
        assert_eq!(*state.dialog(), Dialog::EditEvent(id("A")));
        assert!(state.is_expanded(&id("A")));
    }

    #[test]
    fn test_dialogs_are_exclusive() {
        let mut state = SelectionState::new();
        assert!(state.apply(SelectionAction::AttendanceClicked(id("A"))));
        assert!(!state.apply(SelectionAction::AddClicked));
        assert!(!state.apply(SelectionAction::EditClicked(id("B"))));
        assert_eq!(*state.dialog(), Dialog::Attendance(id("A")));

        assert!(state.apply(SelectionAction::DialogClosed));
        assert!(state.apply(SelectionAction::AddClicked));
        assert_eq!(*state.dialog(), Dialog::NewEvent);
    }

    #[test]
    fn test_row_clicks_ignored_while_dialog_open() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::AddClicked);
        assert!(!state.apply(SelectionAction::RowClicked(id("A"))));
        assert!(state.expanded().is_none());
    }

    #[test]
    fn test_delete_collapses_only_matching_row() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::RowClicked(id("A")));
        assert!(!state.apply(SelectionAction::DeleteConfirmed(id("B"))));
        assert!(state.apply(SelectionAction::DeleteConfirmed(id("A"))));
        assert!(state.expanded().is_none());
    }

    #[test]
    fn test_stale_dialog_target_is_not_found() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::EditClicked(id("A")));
        state.apply(SelectionAction::DeleteConfirmed(id("A")));

        // dialog is still open, but its target is gone
        assert_eq!(*state.dialog(), Dialog::EditEvent(id("A")));
        let events = vec![event("B")];
        assert!(matches!(state.resolve_target(&events), Err(ScheduleError::NotFound(ref i)) if *i == id("A")));

        let events = vec![event("B"), event("A")];
        assert_eq!(state.resolve_target(&events).unwrap().unwrap().name(), "A");
    }

    #[test]
    fn test_new_event_dialog_has_no_target() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::AddClicked);
        assert!(state.resolve_target(&[]).unwrap().is_none());
    }

    #[test]
    fn test_submit_after_rename_follows_expansion() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::RowClicked(id("A")));
        state.apply(SelectionAction::EditClicked(id("A")));
        state.apply(SelectionAction::SubmitSucceeded { identity: Some(id("A2")) });

        assert_eq!(*state.dialog(), Dialog::None);
        assert_eq!(state.expanded(), Some(&id("A2")));
    }

    #[test]
    fn test_submit_without_dialog_is_noop() {
        let mut state = SelectionState::new();
        assert!(!state.apply(SelectionAction::SubmitSucceeded { identity: None }));
    }

    #[test]
    fn test_retain_existing() {
        let mut state = SelectionState::new();
        state.apply(SelectionAction::RowClicked(id("A")));
        state.retain_existing(&[event("A")]);
        assert!(state.is_expanded(&id("A")));
        state.retain_existing(&[event("B")]);
        assert!(state.expanded().is_none());
    }
}
