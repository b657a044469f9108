//! Attendance records and the reconciliation rule for attendance submits.
//!
//! A submit is a point-in-time snapshot: it replaces the event's whole
//! attendance sequence, it never merges with what was there before.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::event::Event;
use super::member::{Member, MemberId};
use crate::error::{ScheduleError, ScheduleResult};

/// Presence of one member at the event that contains this record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AttendanceRecord {
    #[serde(rename = "memberId")]
    pub member_id: MemberId,
}

impl AttendanceRecord {
    pub fn new(member_id: MemberId) -> Self {
        Self { member_id }
    }
}

/// One line of the attendance form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceEntry<'a> {
    pub member: &'a Member,
    pub present: bool,
}

/// Replace `event`'s attendance with one record per id in `present`.
///
/// Records follow roster order, not submission order. Ids missing from the
/// roster reject the whole submit before anything is built.
pub fn submit(
    event: &Event,
    present: &BTreeSet<MemberId>,
    roster: &[Member],
) -> ScheduleResult<Event> {
    let known: HashSet<&MemberId> = roster.iter().map(|m| &m.id).collect();
    let unknown: Vec<MemberId> = present
        .iter()
        .filter(|id| !known.contains(id))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ScheduleError::RosterReference(unknown));
    }

    let mut seen = HashSet::new();
    let records: Vec<AttendanceRecord> = roster
        .iter()
        .filter(|member| present.contains(&member.id) && seen.insert(&member.id))
        .map(|member| AttendanceRecord::new(member.id.clone()))
        .collect();

    debug!(
        event = %event.identity(),
        previous = event.attendance_count(),
        present = records.len(),
        "Reconciled attendance"
    );
    Ok(event.with_attendance(records))
}

/// Attendance form rows for every roster member, pre-checked with the
/// event's current attendance.
pub fn checklist<'a>(event: &Event, roster: &'a [Member]) -> Vec<AttendanceEntry<'a>> {
    roster
        .iter()
        .map(|member| AttendanceEntry {
            member,
            present: event.attended_by(&member.id),
        })
        .collect()
}
