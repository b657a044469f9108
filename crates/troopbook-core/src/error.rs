//! Error taxonomy for schedule and attendance operations.
//!
//! Every core operation returns `ScheduleResult`; nothing is retried and
//! nothing is swallowed. Transport failures carry the underlying `ApiError`.

use thiserror::Error;

use crate::api::ApiError;
use crate::models::{EventIdentity, MemberId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Event name must not be empty")]
    EmptyName,

    #[error("Event date must not be empty")]
    EmptyDate,

    #[error("Invalid event date: {0}")]
    InvalidDate(String),

    #[error("Member {0} is listed more than once in attendance")]
    DuplicateAttendance(MemberId),

    #[error("Member id must not be empty")]
    EmptyMemberId,

    #[error("Member {0} has no name")]
    EmptyMemberName(MemberId),
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Invalid event: {0}")]
    Validation(#[from] ValidationError),

    #[error("An event already exists for {0}")]
    DuplicateIdentity(EventIdentity),

    #[error("Event not found: {0}")]
    NotFound(EventIdentity),

    #[error("Attendance references members not on the roster: {}", join_ids(.0))]
    RosterReference(Vec<MemberId>),

    #[error("Removing {0} requires confirmation")]
    ConfirmationRequired(EventIdentity),

    #[error("No dialog is open for this submission")]
    NoActiveDialog,

    #[error("Transport error: {0}")]
    Transport(#[from] ApiError),
}

impl ScheduleError {
    /// Transport failures are the only ones a manual retry can fix.
    pub fn is_transport(&self) -> bool {
        matches!(self, ScheduleError::Transport(_))
    }
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

fn join_ids(ids: &[MemberId]) -> String {
    ids.iter()
        .map(MemberId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_reference_message_lists_ids() {
        let err = ScheduleError::RosterReference(vec![MemberId::new("dave"), MemberId::new("erin")]);
        assert_eq!(
            err.to_string(),
            "Attendance references members not on the roster: dave, erin"
        );
    }

    #[test]
    fn test_is_transport() {
        assert!(ScheduleError::Transport(ApiError::RateLimited).is_transport());
        assert!(!ScheduleError::Validation(ValidationError::EmptyName).is_transport());
    }
}
