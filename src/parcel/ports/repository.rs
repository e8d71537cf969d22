//! Repository port for parcels, their trace log and abnormal records.

use crate::common::postgres::BlockingError;
use crate::parcel::domain::{
    AbnormalRecord, AbnormalRecordId, Parcel, ParcelId, ParcelStatusUpdate, ParcelTrace, TraceId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for parcel repository operations.
pub type ParcelRepositoryResult<T> = Result<T, ParcelRepositoryError>;

/// Parcel persistence contract.
///
/// Soft-deleted parcels are invisible to every lookup.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParcelRepository: Send + Sync {
    /// Stores a new parcel.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRepositoryError::DuplicateParcel`] when the tracking
    /// number already exists.
    async fn store(&self, parcel: &Parcel) -> ParcelRepositoryResult<()>;

    /// Persists an updated parcel.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRepositoryError::NotFound`] when the parcel does not
    /// exist.
    async fn update(&self, parcel: &Parcel) -> ParcelRepositoryResult<()>;

    /// Finds a live parcel by tracking number.
    async fn find_by_id(&self, id: &ParcelId) -> ParcelRepositoryResult<Option<Parcel>>;

    /// Applies a derived status update in place.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRepositoryError::NotFound`] when the parcel does not
    /// exist.
    async fn update_status(
        &self,
        id: &ParcelId,
        update: &ParcelStatusUpdate,
        at: DateTime<Utc>,
    ) -> ParcelRepositoryResult<()>;

    /// Appends a trace entry.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRepositoryError::DuplicateTrace`] when the trace
    /// identifier already exists.
    async fn append_trace(&self, trace: &ParcelTrace) -> ParcelRepositoryResult<()>;

    /// Returns a parcel's trace entries ordered by operation time.
    async fn traces_for(&self, id: &ParcelId) -> ParcelRepositoryResult<Vec<ParcelTrace>>;

    /// Stores a new abnormal record.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRepositoryError::DuplicateAbnormalRecord`] when the
    /// record identifier already exists.
    async fn store_abnormal_record(&self, record: &AbnormalRecord) -> ParcelRepositoryResult<()>;

    /// Persists an updated abnormal record.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRepositoryError::AbnormalRecordNotFound`] when the
    /// record does not exist.
    async fn update_abnormal_record(&self, record: &AbnormalRecord) -> ParcelRepositoryResult<()>;

    /// Finds an abnormal record by identifier.
    async fn find_abnormal_record(
        &self,
        id: &AbnormalRecordId,
    ) -> ParcelRepositoryResult<Option<AbnormalRecord>>;

    /// Returns a parcel's abnormal records ordered by creation time.
    async fn abnormal_records_for(
        &self,
        id: &ParcelId,
    ) -> ParcelRepositoryResult<Vec<AbnormalRecord>>;
}

/// Errors returned by parcel repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ParcelRepositoryError {
    /// A parcel with the same tracking number already exists.
    #[error("duplicate parcel: {0}")]
    DuplicateParcel(ParcelId),

    /// A trace entry with the same identifier already exists.
    #[error("duplicate trace entry: {0}")]
    DuplicateTrace(TraceId),

    /// An abnormal record with the same identifier already exists.
    #[error("duplicate abnormal record: {0}")]
    DuplicateAbnormalRecord(AbnormalRecordId),

    /// The parcel was not found.
    #[error("parcel not found: {0}")]
    NotFound(ParcelId),

    /// The abnormal record was not found.
    #[error("abnormal record not found: {0}")]
    AbnormalRecordNotFound(AbnormalRecordId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ParcelRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<BlockingError> for ParcelRepositoryError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}
