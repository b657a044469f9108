use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Stable member identifier used to key attendance entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A troop member eligible for attendance marking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MemberRecord")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(id),
            name: name.into(),
        }
    }
}

/// Member as the store sends it.
#[derive(Deserialize)]
struct MemberRecord {
    // Document stores hand the key back as "_id"
    #[serde(alias = "_id")]
    id: String,
    #[serde(default)]
    name: String,
}

impl TryFrom<MemberRecord> for Member {
    type Error = ValidationError;

    fn try_from(record: MemberRecord) -> Result<Self, Self::Error> {
        let id = record.id.trim();
        if id.is_empty() {
            return Err(ValidationError::EmptyMemberId);
        }
        let name = record.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyMemberName(MemberId::new(id)));
        }
        Ok(Member::new(id, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_member() {
        let member: Member = serde_json::from_str(r#"{"id": "m-1", "name": "Alice"}"#).unwrap();
        assert_eq!(member, Member::new("m-1", "Alice"));
    }

    #[test]
    fn test_parse_member_with_document_key() {
        let member: Member =
            serde_json::from_str(r#"{"_id": "62f1c0", "name": "Bob", "rank": "Scout"}"#).unwrap();
        assert_eq!(member.id.as_str(), "62f1c0");
        assert_eq!(member.name, "Bob");
    }

    #[test]
    fn test_member_without_name_is_rejected() {
        let err = serde_json::from_str::<Member>(r#"{"id": "m-1", "name": "  "}"#).unwrap_err();
        assert!(err.to_string().contains("Member m-1 has no name"));
        assert!(serde_json::from_str::<Member>(r#"{"id": "m-1"}"#).is_err());
    }

    #[test]
    fn test_member_without_id_is_rejected() {
        let err = serde_json::from_str::<Member>(r#"{"id": "", "name": "Alice"}"#).unwrap_err();
        assert!(err.to_string().contains("Member id must not be empty"));
    }

    #[test]
    fn test_member_id_serializes_as_string() {
        assert_eq!(serde_json::to_string(&MemberId::new("m-7")).unwrap(), "\"m-7\"");
    }
}
