use std::collections::HashSet;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::attendance::AttendanceRecord;
use super::branch::{self, Branch, BranchColors, EventType};
use super::member::MemberId;
use crate::error::ValidationError;
use crate::utils::format_date;

/// The (name, date) pair that identifies an event within one schedule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EventIdentity {
    pub name: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub date: NaiveDate,
}

impl EventIdentity {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        let name: String = name.into();
        Self {
            name: name.trim().to_string(),
            date,
        }
    }

    /// Build an identity from user input, applying the same rules as event
    /// validation.
    pub fn parse(name: &str, date: &str) -> Result<Self, ValidationError> {
        Ok(Self::new(validate_name(name)?, parse_date(date)?))
    }
}

impl std::fmt::Display for EventIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.date.format("%Y-%m-%d"))
    }
}

/// Unvalidated event as it arrives from a form or over the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCandidate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub branch: String,
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
}

impl EventCandidate {
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Validate and normalize into an `Event`. The candidate is left as is.
    pub fn validate(&self) -> Result<Event, ValidationError> {
        let name = validate_name(&self.name)?;
        let date = parse_date(&self.date)?;

        let mut seen = HashSet::new();
        for record in &self.attendance {
            if !seen.insert(&record.member_id) {
                return Err(ValidationError::DuplicateAttendance(record.member_id.clone()));
            }
        }

        Ok(Event {
            name: name.to_string(),
            date,
            branch: Branch::parse(&self.branch),
            event_type: EventType::parse(&self.event_type),
            attendance: self.attendance.clone(),
        })
    }
}

impl TryFrom<EventCandidate> for Event {
    type Error = ValidationError;

    fn try_from(candidate: EventCandidate) -> Result<Self, Self::Error> {
        candidate.validate()
    }
}

/// Partial edit of an event. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventChanges {
    pub name: Option<String>,
    pub date: Option<String>,
    pub branch: Option<String>,
    pub event_type: Option<String>,
}

impl EventChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.date.is_none()
            && self.branch.is_none()
            && self.event_type.is_none()
    }

    /// Merge onto `event`, yielding a candidate that still has to be
    /// validated. Attendance is carried over untouched.
    pub fn apply_to(&self, event: &Event) -> EventCandidate {
        let mut candidate = event.to_candidate();
        if let Some(ref name) = self.name {
            candidate.name = name.clone();
        }
        if let Some(ref date) = self.date {
            candidate.date = date.clone();
        }
        if let Some(ref branch) = self.branch {
            candidate.branch = branch.clone();
        }
        if let Some(ref event_type) = self.event_type {
            candidate.event_type = event_type.clone();
        }
        candidate
    }

    /// Identity the event will have once these changes are applied to the
    /// event currently identified by `current`.
    pub fn resulting_identity(
        &self,
        current: &EventIdentity,
    ) -> Result<EventIdentity, ValidationError> {
        let name = match self.name {
            Some(ref name) => validate_name(name)?.to_string(),
            None => current.name.clone(),
        };
        let date = match self.date {
            Some(ref date) => parse_date(date)?,
            None => current.date,
        };
        Ok(EventIdentity::new(name, date))
    }
}

/// A validated scheduled event.
///
/// Fields are private so every `Event` has passed `EventCandidate::validate`;
/// deserialization goes through the same path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventCandidate")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Event {
    name: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    date: NaiveDate,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    branch: Branch,
    #[serde(rename = "type")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    event_type: EventType,
    attendance: Vec<AttendanceRecord>,
}

impl Event {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn branch(&self) -> &Branch {
        &self.branch
    }

    pub fn event_type(&self) -> &EventType {
        &self.event_type
    }

    pub fn attendance(&self) -> &[AttendanceRecord] {
        &self.attendance
    }

    pub fn identity(&self) -> EventIdentity {
        EventIdentity::new(self.name.clone(), self.date)
    }

    pub fn has_identity(&self, identity: &EventIdentity) -> bool {
        self.name == identity.name && self.date == identity.date
    }

    pub fn attended_by(&self, member_id: &MemberId) -> bool {
        self.attendance.iter().any(|r| &r.member_id == member_id)
    }

    pub fn attendance_count(&self) -> usize {
        self.attendance.len()
    }

    pub fn is_highlighted(&self) -> bool {
        branch::is_highlighted(self)
    }

    pub fn colors(&self) -> Option<BranchColors> {
        self.branch.colors()
    }

    /// List date label: "Sep 10, 2022"
    pub fn formatted_date(&self) -> String {
        format_date(self.date)
    }

    pub fn to_candidate(&self) -> EventCandidate {
        EventCandidate {
            name: self.name.clone(),
            date: self.date.format("%Y-%m-%d").to_string(),
            branch: self.branch.label().to_string(),
            event_type: self.event_type.label().to_string(),
            attendance: self.attendance.clone(),
        }
    }

    /// Copy of this event with its attendance replaced. Callers are
    /// responsible for the no-duplicate invariant.
    pub(crate) fn with_attendance(&self, attendance: Vec<AttendanceRecord>) -> Self {
        Self {
            attendance,
            ..self.clone()
        }
    }
}

fn validate_name(name: &str) -> Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        Err(ValidationError::EmptyName)
    } else {
        Ok(name)
    }
}

/// Parse an event date. Accepts "YYYY-MM-DD" and full RFC 3339 timestamps,
/// keeping only the calendar date of the latter.
pub fn parse_date(date: &str) -> Result<NaiveDate, ValidationError> {
    let date = date.trim();
    if date.is_empty() {
        return Err(ValidationError::EmptyDate);
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Ok(parsed);
    }
    DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.date_naive())
        .map_err(|_| ValidationError::InvalidDate(date.to_string()))
}

/// First (name, date) pair that occurs more than once, if any.
pub fn find_duplicate(events: &[Event]) -> Option<EventIdentity> {
    let mut seen = HashSet::new();
    events
        .iter()
        .map(Event::identity)
        .find(|identity| !seen.insert(identity.clone()))
}
