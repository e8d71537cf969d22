//! Abnormal records raised against individual parcels.

use super::{AbnormalRecordId, ParcelDomainError, ParcelId, ParseAbnormalRecordStatusError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Processing status of an abnormal record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbnormalRecordStatus {
    /// Reported and awaiting processing.
    Pending,
    /// Processed.
    Resolved,
}

impl AbnormalRecordStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}

impl TryFrom<&str> for AbnormalRecordStatus {
    type Error = ParseAbnormalRecordStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "resolved" => Ok(Self::Resolved),
            _ => Err(ParseAbnormalRecordStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for AbnormalRecordStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Structured exception recorded against a parcel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbnormalRecord {
    id: AbnormalRecordId,
    parcel_id: ParcelId,
    abnormal_type: String,
    reason: String,
    processing_method: Option<String>,
    processor: String,
    processed_at: Option<DateTime<Utc>>,
    status: AbnormalRecordStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted abnormal record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAbnormalRecordData {
    /// Persisted record identifier.
    pub id: AbnormalRecordId,
    /// Persisted parcel identifier.
    pub parcel_id: ParcelId,
    /// Persisted abnormality category.
    pub abnormal_type: String,
    /// Persisted reason.
    pub reason: String,
    /// Persisted processing method, if resolved.
    pub processing_method: Option<String>,
    /// Persisted processor.
    pub processor: String,
    /// Persisted processing timestamp, if resolved.
    pub processed_at: Option<DateTime<Utc>>,
    /// Persisted processing status.
    pub status: AbnormalRecordStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl AbnormalRecord {
    /// Opens a pending record.
    #[must_use]
    pub fn open(
        id: AbnormalRecordId,
        parcel_id: ParcelId,
        abnormal_type: impl Into<String>,
        reason: impl Into<String>,
        processor: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            parcel_id,
            abnormal_type: abnormal_type.into(),
            reason: reason.into(),
            processing_method: None,
            processor: processor.into(),
            processed_at: None,
            status: AbnormalRecordStatus::Pending,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a record from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedAbnormalRecordData) -> Self {
        Self {
            id: data.id,
            parcel_id: data.parcel_id,
            abnormal_type: data.abnormal_type,
            reason: data.reason,
            processing_method: data.processing_method,
            processor: data.processor,
            processed_at: data.processed_at,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> &AbnormalRecordId {
        &self.id
    }

    /// Returns the parcel the record was raised against.
    #[must_use]
    pub const fn parcel_id(&self) -> &ParcelId {
        &self.parcel_id
    }

    /// Returns the abnormality category.
    #[must_use]
    pub fn abnormal_type(&self) -> &str {
        &self.abnormal_type
    }

    /// Returns the reported reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns how the abnormality was processed, once resolved.
    #[must_use]
    pub fn processing_method(&self) -> Option<&str> {
        self.processing_method.as_deref()
    }

    /// Returns the person responsible for processing.
    #[must_use]
    pub fn processor(&self) -> &str {
        &self.processor
    }

    /// Returns when the record was resolved.
    #[must_use]
    pub const fn processed_at(&self) -> Option<DateTime<Utc>> {
        self.processed_at
    }

    /// Returns the processing status.
    #[must_use]
    pub const fn status(&self) -> AbnormalRecordStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the record resolved.
    ///
    /// A non-blank `processor` replaces the reporting processor.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelDomainError::AbnormalRecordResolved`] when the record
    /// was already resolved.
    pub fn resolve(
        &mut self,
        processing_method: impl Into<String>,
        processor: &str,
        clock: &impl Clock,
    ) -> Result<(), ParcelDomainError> {
        if self.status == AbnormalRecordStatus::Resolved {
            return Err(ParcelDomainError::AbnormalRecordResolved(self.id.clone()));
        }
        let timestamp = clock.utc();
        self.processing_method = Some(processing_method.into());
        if let Some(name) = crate::common::non_blank(processor) {
            self.processor = name;
        }
        self.processed_at = Some(timestamp);
        self.status = AbnormalRecordStatus::Resolved;
        self.updated_at = timestamp;
        Ok(())
    }
}
