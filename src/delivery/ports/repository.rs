//! Repository port for delivery tasks and their ordered parcel bindings.

use crate::common::postgres::BlockingError;
use crate::delivery::domain::{DeliveryBinding, DeliveryStatus, DeliveryTask, DeliveryTaskId};
use crate::parcel::domain::ParcelId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for delivery repository operations.
pub type DeliveryRepositoryResult<T> = Result<T, DeliveryRepositoryError>;

/// Delivery task persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryTaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryRepositoryError::DuplicateTask`] when the task
    /// identifier already exists.
    async fn store(&self, task: &DeliveryTask) -> DeliveryRepositoryResult<()>;

    /// Persists an updated task.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &DeliveryTask) -> DeliveryRepositoryResult<()>;

    /// Finds a task by identifier.
    async fn find_by_id(
        &self,
        id: &DeliveryTaskId,
    ) -> DeliveryRepositoryResult<Option<DeliveryTask>>;

    /// Lists a courier's tasks, newest first, optionally filtered by status.
    async fn find_by_courier(
        &self,
        courier_id: &str,
        status: Option<DeliveryStatus>,
    ) -> DeliveryRepositoryResult<Vec<DeliveryTask>>;

    /// Replaces every binding of a task with `bindings` atomically.
    async fn replace_bindings(
        &self,
        id: &DeliveryTaskId,
        bindings: &[DeliveryBinding],
    ) -> DeliveryRepositoryResult<()>;

    /// Returns a task's bindings in delivery order.
    async fn bindings_for(
        &self,
        id: &DeliveryTaskId,
    ) -> DeliveryRepositoryResult<Vec<DeliveryBinding>>;

    /// Finds the binding of one parcel to a task.
    async fn find_binding(
        &self,
        id: &DeliveryTaskId,
        parcel_id: &ParcelId,
    ) -> DeliveryRepositoryResult<Option<DeliveryBinding>>;

    /// Persists an updated binding.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryRepositoryError::BindingNotFound`] when the parcel
    /// is not bound to the task.
    async fn update_binding(&self, binding: &DeliveryBinding) -> DeliveryRepositoryResult<()>;

    /// Counts the bindings of a task.
    async fn count_bindings(&self, id: &DeliveryTaskId) -> DeliveryRepositoryResult<u32>;
}

/// Errors returned by delivery repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DeliveryRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate delivery task: {0}")]
    DuplicateTask(DeliveryTaskId),

    /// The task was not found.
    #[error("delivery task not found: {0}")]
    NotFound(DeliveryTaskId),

    /// The parcel is not bound to the task.
    #[error("parcel {parcel_id} is not bound to delivery task {task_id}")]
    BindingNotFound {
        /// Task the binding was looked up in.
        task_id: DeliveryTaskId,
        /// Parcel that was not bound.
        parcel_id: ParcelId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DeliveryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<BlockingError> for DeliveryRepositoryError {
    fn from(err: BlockingError) -> Self {
        Self::persistence(err)
    }
}
