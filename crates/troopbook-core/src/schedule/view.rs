//! List rows derived from the schedule for rendering.
//!
//! Sorting and filtering are projections; the stored order never changes.

use std::cmp::Ordering;

use crate::models::{Branch, BranchColors, Event, EventIdentity};
use crate::selection::SelectionState;
use crate::utils::{cmp_ignore_case, contains_ignore_case};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventSortColumn {
    Name,
    #[default]
    Date,
    Branch,
}

impl EventSortColumn {
    fn compare(&self, a: &Event, b: &Event) -> Ordering {
        match self {
            EventSortColumn::Name => {
                cmp_ignore_case(a.name(), b.name()).then_with(|| a.date().cmp(&b.date()))
            }
            EventSortColumn::Date => a
                .date()
                .cmp(&b.date())
                .then_with(|| cmp_ignore_case(a.name(), b.name())),
            EventSortColumn::Branch => cmp_ignore_case(a.branch().label(), b.branch().label())
                .then_with(|| a.date().cmp(&b.date())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    pub branch: Option<Branch>,
    /// Case-insensitive match against name or branch label
    pub search: Option<String>,
    pub highlighted_only: bool,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ref branch) = self.branch {
            if event.branch() != branch {
                return false;
            }
        }
        if let Some(ref query) = self.search {
            if !contains_ignore_case(event.name(), query)
                && !contains_ignore_case(event.branch().label(), query)
            {
                return false;
            }
        }
        !self.highlighted_only || event.is_highlighted()
    }
}

/// How the date cell renders: plain text, or as a tag styled by branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateDisplay {
    Plain,
    Tag(Branch),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow<'a> {
    pub event: &'a Event,
    pub identity: EventIdentity,
    pub date_label: String,
    pub highlighted: bool,
    pub expanded: bool,
    /// Row colors; only set when the row is expanded or highlighted.
    pub colors: Option<BranchColors>,
    pub date_display: DateDisplay,
}

impl<'a> EventRow<'a> {
    pub fn new(event: &'a Event, expanded: bool) -> Self {
        let highlighted = event.is_highlighted();
        let emphasized = expanded || highlighted;
        Self {
            event,
            identity: event.identity(),
            date_label: event.formatted_date(),
            highlighted,
            expanded,
            colors: if emphasized { event.colors() } else { None },
            date_display: if emphasized {
                DateDisplay::Plain
            } else {
                DateDisplay::Tag(event.branch().clone())
            },
        }
    }
}

/// Filter, optionally sort (column, ascending), and decorate events for
/// display.
pub fn rows<'a>(
    events: &'a [Event],
    filter: &EventFilter,
    sort: Option<(EventSortColumn, bool)>,
    selection: &SelectionState,
) -> Vec<EventRow<'a>> {
    let mut visible: Vec<&Event> = events.iter().filter(|e| filter.matches(e)).collect();
    if let Some((column, ascending)) = sort {
        visible.sort_by(|a, b| {
            let ordering = column.compare(a, b);
            if ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }
    visible
        .into_iter()
        .map(|event| EventRow::new(event, selection.is_expanded(&event.identity())))
        .collect()
}
