//! Identifier types for the transport domain.

use super::TransportDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum identifier length, matching the `VARCHAR(32)` key column.
const MAX_ID_LENGTH: usize = 32;

/// Transport task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransportTaskId(String);

impl TransportTaskId {
    /// Creates a validated task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TransportDomainError::EmptyTaskId`] when the value is blank
    /// or [`TransportDomainError::TaskIdTooLong`] when it exceeds 32
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TransportDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TransportDomainError::EmptyTaskId);
        }
        if normalized.chars().count() > MAX_ID_LENGTH {
            return Err(TransportDomainError::TaskIdTooLong(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TransportTaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TransportTaskId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
