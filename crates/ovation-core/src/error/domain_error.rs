//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid room id: {0}")]
    InvalidRoomId(String),

    #[error("Invalid recipient name: {0}")]
    InvalidRecipient(String),

    #[error("Unknown reaction kind: {0}")]
    UnknownReactionKind(String),

    // =========================================================================
    // Store Errors
    // =========================================================================
    #[error("Event store unavailable: {0}")]
    StoreUnavailable(String),
}

impl DomainError {
    /// Check if this is a validation error
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidRoomId(_) | Self::InvalidRecipient(_) | Self::UnknownReactionKind(_)
        )
    }

    /// Check if this error means the durable store rejected the operation
    #[must_use]
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }

    /// Get error code for API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRoomId(_) => "INVALID_ROOM_ID",
            Self::InvalidRecipient(_) => "INVALID_RECIPIENT",
            Self::UnknownReactionKind(_) => "UNKNOWN_REACTION_KIND",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_validation() {
        assert!(DomainError::InvalidRoomId("  ".into()).is_validation());
        assert!(DomainError::InvalidRecipient("x".into()).is_validation());
        assert!(!DomainError::StoreUnavailable("down".into()).is_validation());
    }

    #[test]
    fn test_is_store_unavailable() {
        assert!(DomainError::StoreUnavailable("down".into()).is_store_unavailable());
        assert!(!DomainError::InvalidRoomId("".into()).is_store_unavailable());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DomainError::StoreUnavailable("down".into()).code(),
            "STORE_UNAVAILABLE"
        );
        assert_eq!(DomainError::InvalidRoomId("".into()).code(), "INVALID_ROOM_ID");
    }
}
