//! Recipient name - who a reaction is addressed to
//!
//! An empty or whitespace-only name normalizes to "absent": the reaction
//! counts toward the room total but never appears in the ranking.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum accepted length of a recipient name, in characters
pub const MAX_RECIPIENT_LEN: usize = 64;

/// A non-empty, trimmed recipient name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipient(String);

impl Recipient {
    /// Normalize raw input from the boundary
    ///
    /// Absent, empty, and whitespace-only input all become `None`; oversized
    /// names are rejected.
    pub fn normalize(raw: Option<&str>) -> Result<Option<Self>, DomainError> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > MAX_RECIPIENT_LEN {
            return Err(DomainError::InvalidRecipient(format!(
                "must be at most {MAX_RECIPIENT_LEN} characters"
            )));
        }
        Ok(Some(Self(trimmed.to_string())))
    }

    /// View the name as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Recipient {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
