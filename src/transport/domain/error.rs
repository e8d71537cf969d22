//! Error types for transport domain validation and parsing.

use super::TransportStatus;
use crate::common::InvalidTransition;
use thiserror::Error;

/// Errors returned by transport domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportDomainError {
    /// The task identifier is empty after trimming.
    #[error("transport task id must not be empty")]
    EmptyTaskId,

    /// The task identifier exceeds the 32-character storage limit.
    #[error("transport task id exceeds 32 character limit: {0}")]
    TaskIdTooLong(String),

    /// A required field is empty after trimming.
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    /// The route description is not valid JSON.
    #[error("route description is not valid JSON: {0}")]
    InvalidRoute(String),

    /// The route distance is negative or not finite.
    #[error("route distance must be a non-negative number of kilometres")]
    InvalidDistance,

    /// The status transition table forbids the change.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// Parcels cannot be bound in the task's current status.
    #[error("transport task in status {0} cannot bind parcels")]
    NotBindable(TransportStatus),

    /// Abnormality handling requires the task to be abnormal.
    #[error("transport task is {0}, not abnormal")]
    NotAbnormal(TransportStatus),
}

/// Error returned while parsing transport statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown transport status: {0}")]
pub struct ParseTransportStatusError(pub String);
