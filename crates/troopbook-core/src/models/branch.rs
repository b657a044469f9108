use serde::{Deserialize, Serialize};

use super::event::Event;

/// Branches whose events are always highlighted in the schedule list.
pub const HIGHLIGHTED_BRANCHES: [Branch; 4] = [
    Branch::Camp,
    Branch::DayHike,
    Branch::Award,
    Branch::Fundraiser,
];

/// Event category. The taxonomy is open: unknown labels are kept verbatim
/// in `Other` and render without styling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Branch {
    Camp,
    DayHike,
    Award,
    Fundraiser,
    Meeting,
    Service,
    Other(String),
}

impl Branch {
    /// Normalize a free-form label to a known branch.
    ///
    /// Matching ignores case, surrounding whitespace and `-`/`_` separators,
    /// so "day-hike" and "DAY HIKE" both map to `DayHike`. Anything else is
    /// passed through trimmed but otherwise unchanged.
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        let key: Vec<String> = trimmed
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .map(|part| part.to_ascii_lowercase())
            .collect();

        match key.join(" ").as_str() {
            "camp" => Branch::Camp,
            "day hike" => Branch::DayHike,
            "award" => Branch::Award,
            "fundraiser" => Branch::Fundraiser,
            "meeting" => Branch::Meeting,
            "service" => Branch::Service,
            _ => Branch::Other(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Branch::Camp => "Camp",
            Branch::DayHike => "Day Hike",
            Branch::Award => "Award",
            Branch::Fundraiser => "Fundraiser",
            Branch::Meeting => "Meeting",
            Branch::Service => "Service",
            Branch::Other(label) => label,
        }
    }

    /// Display colors for this branch, if it has any.
    pub fn colors(&self) -> Option<BranchColors> {
        let (background_color, text_color) = match self {
            Branch::Camp => ("#2e7d32", "#ffffff"),
            Branch::DayHike => ("#8d6e63", "#ffffff"),
            Branch::Award => ("#f9a825", "#000000"),
            Branch::Fundraiser => ("#1565c0", "#ffffff"),
            Branch::Meeting => ("#e0e0e0", "#000000"),
            Branch::Service => ("#6a1b9a", "#ffffff"),
            Branch::Other(_) => return None,
        };
        Some(BranchColors {
            background_color,
            text_color,
        })
    }

    pub fn is_highlighted(&self) -> bool {
        HIGHLIGHTED_BRANCHES.contains(self)
    }
}

impl From<String> for Branch {
    fn from(label: String) -> Self {
        Branch::parse(&label)
    }
}

impl From<Branch> for String {
    fn from(branch: Branch) -> Self {
        match branch {
            Branch::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Event type label. Only "HTT" (troop-wide) carries meaning; everything
/// else is kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Htt,
    Other(String),
}

impl EventType {
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case("htt") {
            EventType::Htt
        } else {
            EventType::Other(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EventType::Htt => "HTT",
            EventType::Other(label) => label,
        }
    }
}

impl From<String> for EventType {
    fn from(label: String) -> Self {
        EventType::parse(&label)
    }
}

impl From<EventType> for String {
    fn from(event_type: EventType) -> Self {
        match event_type {
            EventType::Htt => "HTT".to_string(),
            EventType::Other(label) => label,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct BranchColors {
    pub background_color: &'static str,
    pub text_color: &'static str,
}

/// Colors for a branch label; unknown branches have none.
pub fn colors_for(branch: &Branch) -> Option<BranchColors> {
    branch.colors()
}

/// An event is highlighted when it is troop-wide (type "HTT") or belongs to
/// one of the highlighted branches.
pub fn is_highlighted(event: &Event) -> bool {
    *event.event_type() == EventType::Htt || event.branch().is_highlighted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventCandidate;

    fn event(event_type: &str, branch: &str) -> Event {
        EventCandidate {
            name: "Test".to_string(),
            date: "2022-09-10".to_string(),
            branch: branch.to_string(),
            event_type: event_type.to_string(),
            attendance: Vec::new(),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_branch_parse_known() {
        assert_eq!(Branch::parse("Camp"), Branch::Camp);
        assert_eq!(Branch::parse("Day Hike"), Branch::DayHike);
        assert_eq!(Branch::parse("Award"), Branch::Award);
        assert_eq!(Branch::parse("Fundraiser"), Branch::Fundraiser);
    }

    #[test]
    fn test_branch_parse_normalizes_spelling() {
        assert_eq!(Branch::parse("  camp "), Branch::Camp);
        assert_eq!(Branch::parse("day-hike"), Branch::DayHike);
        assert_eq!(Branch::parse("DAY   HIKE"), Branch::DayHike);
        assert_eq!(Branch::parse("day_hike"), Branch::DayHike);
    }

    #[test]
    fn test_branch_parse_unknown_passes_through() {
        assert_eq!(
            Branch::parse(" Court of Honor "),
            Branch::Other("Court of Honor".to_string())
        );
        assert_eq!(Branch::parse(""), Branch::Other(String::new()));
    }

    #[test]
    fn test_branch_serde_uses_labels() {
        let json = serde_json::to_string(&Branch::DayHike).unwrap();
        assert_eq!(json, "\"Day Hike\"");
        let parsed: Branch = serde_json::from_str("\"Polar Bear\"").unwrap();
        assert_eq!(parsed, Branch::Other("Polar Bear".to_string()));
    }

    #[test]
    fn test_colors_for_unknown_branch_is_none() {
        assert!(colors_for(&Branch::Other("Unknown".to_string())).is_none());
        let camp = colors_for(&Branch::Camp).unwrap();
        assert_eq!(camp.background_color, "#2e7d32");
    }

    #[test]
    fn test_event_type_parse() {
        assert_eq!(EventType::parse("HTT"), EventType::Htt);
        assert_eq!(EventType::parse("htt "), EventType::Htt);
        assert_eq!(EventType::parse("Patrol"), EventType::Other("Patrol".to_string()));
        assert_eq!(String::from(EventType::Htt), "HTT");
    }

    #[test]
    fn test_is_highlighted() {
        assert!(is_highlighted(&event("HTT", "Unknown")));
        assert!(is_highlighted(&event("Other", "Camp")));
        assert!(is_highlighted(&event("Other", "Day Hike")));
        assert!(!is_highlighted(&event("Other", "Unknown")));
        assert!(!is_highlighted(&event("Other", "Meeting")));
    }
}
