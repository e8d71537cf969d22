//! Identifier types for the delivery domain.

use super::DeliveryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum identifier length, matching the `VARCHAR(32)` key column.
const MAX_ID_LENGTH: usize = 32;

/// Delivery task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryTaskId(String);

impl DeliveryTaskId {
    /// Creates a validated task identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryDomainError::EmptyTaskId`] when the value is blank
    /// or [`DeliveryDomainError::TaskIdTooLong`] when it exceeds 32
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, DeliveryDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(DeliveryDomainError::EmptyTaskId);
        }
        if normalized.chars().count() > MAX_ID_LENGTH {
            return Err(DeliveryDomainError::TaskIdTooLong(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DeliveryTaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for DeliveryTaskId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
