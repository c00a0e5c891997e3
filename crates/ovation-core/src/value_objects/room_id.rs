//! Room identifier - a validated, namespace-isolating room name
//!
//! Rooms are created lazily, so a `RoomId` is never "unknown"; it only has
//! to be well-formed.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::DomainError;

/// Maximum accepted length of a room id, in characters
pub const MAX_ROOM_ID_LEN: usize = 128;

/// A non-empty, trimmed room identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Parse a raw string into a `RoomId`
    ///
    /// Leading/trailing whitespace is trimmed. Empty or oversized input is
    /// rejected.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidRoomId("must not be empty".into()));
        }
        if trimmed.chars().count() > MAX_ROOM_ID_LEN {
            return Err(DomainError::InvalidRoomId(format!(
                "must be at most {MAX_ROOM_ID_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// View the id as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the inner string
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for RoomId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RoomId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RoomId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
