//! Repository port for transport tasks and their parcel bindings.

use crate::common::postgres::BlockingError;
use crate::parcel::domain::ParcelId;
use crate::transport::domain::{TransportBinding, TransportStatus, TransportTask, TransportTaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for transport repository operations.
pub type TransportRepositoryResult<T> = Result<T, TransportRepositoryError>;

/// Transport task persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransportTaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TransportRepositoryError::DuplicateTask`] when the task
    /// identifier already exists.
    async fn store(&self, task: &TransportTask) -> TransportRepositoryResult<()>;

    /// Persists an updated task.
    ///
    /// # Errors
    ///
    /// Returns [`TransportRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &TransportTask) -> TransportRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(
        &self,
        id: &TransportTaskId,
    ) -> TransportRepositoryResult<Option<TransportTask>>;

    /// Lists a driver's tasks, newest first, optionally filtered by status.
    async fn find_by_driver(
        &self,
        driver_id: &str,
        status: Option<TransportStatus>,
    ) -> TransportRepositoryResult<Vec<TransportTask>>;

    /// Returns the parcels bound to a task in binding order.
    async fn bound_parcel_ids(
        &self,
        id: &TransportTaskId,
    ) -> TransportRepositoryResult<Vec<ParcelId>>;

    /// Inserts a batch of bindings atomically.
    ///
    /// # Errors
    ///
    /// Returns [`TransportRepositoryError::DuplicateBinding`] when a parcel
    /// is already bound to the task; no binding of the batch is kept.
    async fn insert_bindings(&self, bindings: &[TransportBinding]) -> TransportRepositoryResult<()>;

    /// Counts the bindings of a task.
    async fn count_bindings(&self, id: &TransportTaskId) -> TransportRepositoryResult<u32>;
}

/// Errors returned by transport repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TransportRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate transport task: {0}")]
    DuplicateTask(TransportTaskId),

    /// The task was not found.
    #[error("transport task not found: {0}")]
    NotFound(TransportTaskId),

    /// The parcel is already bound to the task.
    #[error("parcel {parcel_id} already bound to transport task {task_id}")]
    DuplicateBinding {
        /// Task the binding belongs to.
        task_id: TransportTaskId,
        /// Parcel that was already bound.
        parcel_id: ParcelId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TransportRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<BlockingError> for TransportRepositoryError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}
