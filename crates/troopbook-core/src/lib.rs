//! Core library for troopbook.
//!
//! Manages a troop's schedule of events and per-event attendance of a
//! member roster:
//!
//! - `models`: events, branches, members and attendance records
//! - `schedule`: the session's event collection and its list view
//! - `roster`: the member roster, cached per session
//! - `selection`: expanded row and active dialog
//! - `backend` / `api`: the whole-collection store contract and its HTTP client
//! - `workspace`: all of the above for one session

pub mod api;
pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod roster;
pub mod schedule;
pub mod selection;
pub mod utils;
pub mod workspace;

pub use api::{ApiClient, ApiError};
pub use backend::{MemoryBackend, ScheduleBackend};
pub use config::Config;
pub use error::{ScheduleError, ScheduleResult, ValidationError};
pub use models::{
    AttendanceRecord, Branch, BranchColors, Event, EventCandidate, EventChanges, EventIdentity,
    EventType, Member, MemberId,
};
pub use roster::MemberRoster;
pub use schedule::{Confirmation, EventFilter, EventSortColumn, ScheduleStore};
pub use selection::{Dialog, SelectionAction, SelectionState};
pub use workspace::{DialogSubmission, OwnedRow, Workspace};
