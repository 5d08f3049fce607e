use crate::error::SettlementError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a group participant.
///
/// Ordering is lexicographic on the identifier and is what every
/// deterministic tie-break in the engine falls back on. Textual identifiers
/// go through [`Member::parse`], including when deserialized.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Member(String);

impl Member {
    pub fn parse(id: impl Into<String>) -> Result<Self, SettlementError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SettlementError::InvalidMember);
        }
        Ok(Member(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Member {
    type Error = SettlementError;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        Member::parse(id)
    }
}

impl TryFrom<String> for Member {
    type Error = SettlementError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Member::parse(id)
    }
}

impl From<Member> for String {
    fn from(member: Member) -> Self {
        member.0
    }
}

impl From<u64> for Member {
    fn from(id: u64) -> Self {
        Member(id.to_string())
    }
}

impl From<i64> for Member {
    fn from(id: i64) -> Self {
        Member(id.to_string())
    }
}
