//! Data models for the troop schedule.
//!
//! - `Event`, `EventCandidate`, `EventIdentity`: scheduled events and their
//!   validation rules
//! - `Branch`, `EventType`, `BranchColors`: category taxonomy and display hints
//! - `Member`, `MemberId`: the attendance roster
//! - `AttendanceRecord`: per-event presence and the submit reconciliation

pub mod attendance;
pub mod branch;
pub mod event;
pub mod member;

pub use attendance::{AttendanceEntry, AttendanceRecord};
pub use branch::{colors_for, is_highlighted, Branch, BranchColors, EventType, HIGHLIGHTED_BRANCHES};
pub use event::{parse_date, Event, EventCandidate, EventChanges, EventIdentity};
pub use member::{Member, MemberId};
