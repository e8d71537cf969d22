//! Error types for delivery domain validation and parsing.

use super::DeliveryStatus;
use crate::common::InvalidTransition;
use crate::parcel::domain::ParcelId;
use thiserror::Error;

/// Errors returned by delivery domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryDomainError {
    /// The task identifier is empty after trimming.
    #[error("delivery task id must not be empty")]
    EmptyTaskId,

    /// The task identifier exceeds the 32-character storage limit.
    #[error("delivery task id exceeds 32 character limit: {0}")]
    TaskIdTooLong(String),

    /// A required field is empty after trimming.
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    /// The status transition table forbids the change.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// Parcels can only be bound while the task is pending.
    #[error("delivery task in status {0} cannot bind parcels")]
    NotBindable(DeliveryStatus),

    /// Abnormality handling requires the task to be abnormal.
    #[error("delivery task is {0}, not abnormal")]
    NotAbnormal(DeliveryStatus),

    /// Completion is blocked by a bound parcel without a signature.
    #[error("parcel {0} has not been signed for")]
    UnsignedPackage(ParcelId),
}

/// Error returned while parsing delivery statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown delivery status: {0}")]
pub struct ParseDeliveryStatusError(pub String);

/// Error returned while parsing sign types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sign type: {0}")]
pub struct ParseSignTypeError(pub String);
