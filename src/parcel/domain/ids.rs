//! Identifier types for the parcel domain.

use super::ParcelDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum identifier length, matching the `VARCHAR(32)` key columns.
const MAX_ID_LENGTH: usize = 32;

fn validated(raw: String, label: &'static str) -> Result<String, ParcelDomainError> {
    let normalized = raw.trim();
    if normalized.is_empty() {
        return Err(ParcelDomainError::EmptyIdentifier(label));
    }
    if normalized.chars().count() > MAX_ID_LENGTH {
        return Err(ParcelDomainError::IdentifierTooLong(raw));
    }
    Ok(normalized.to_owned())
}

/// Parcel tracking number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParcelId(String);

impl ParcelId {
    /// Creates a validated tracking number.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelDomainError::EmptyIdentifier`] when the value is blank
    /// or [`ParcelDomainError::IdentifierTooLong`] when it exceeds 32
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ParcelDomainError> {
        validated(value.into(), "parcel id").map(Self)
    }

    /// Returns the tracking number as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ParcelId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ParcelId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Identifier of a parcel trace entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Creates a validated trace identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelDomainError`] when the value is blank or too long.
    pub fn new(value: impl Into<String>) -> Result<Self, ParcelDomainError> {
        validated(value.into(), "trace id").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Identifier of an abnormal record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbnormalRecordId(String);

impl AbnormalRecordId {
    /// Creates a validated abnormal record identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelDomainError`] when the value is blank or too long.
    pub fn new(value: impl Into<String>) -> Result<Self, ParcelDomainError> {
        validated(value.into(), "abnormal record id").map(Self)
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbnormalRecordId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
