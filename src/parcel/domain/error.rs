//! Error types for parcel domain validation and parsing.

use super::AbnormalRecordId;
use thiserror::Error;

/// Errors returned while constructing parcel domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParcelDomainError {
    /// An identifier is empty after trimming.
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    /// An identifier exceeds the 32-character storage limit.
    #[error("identifier exceeds 32 character limit: {0}")]
    IdentifierTooLong(String),

    /// A required text field is empty after trimming.
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    /// The parcel weight is not a positive finite number.
    #[error("parcel weight must be a positive number of kilograms")]
    InvalidWeight,

    /// A dimension is negative or not finite.
    #[error("parcel {0} must be a non-negative number of centimetres")]
    InvalidDimension(&'static str),

    /// The abnormal record has already been resolved.
    #[error("abnormal record {0} is already resolved")]
    AbnormalRecordResolved(AbnormalRecordId),
}

/// Error returned while parsing parcel statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown parcel status: {0}")]
pub struct ParseParcelStatusError(pub String);

/// Error returned while parsing trace node types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown trace node type: {0}")]
pub struct ParseNodeTypeError(pub String);

/// Error returned while parsing abnormal record statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown abnormal record status: {0}")]
pub struct ParseAbnormalRecordStatusError(pub String);
