//! Caller-facing error taxonomy.
//!
//! Service errors carry rich context; [`ErrorKind`] collapses them into the
//! small set an outer transport layer maps onto response codes.

use std::fmt;

/// Classification of a failed core operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required input was missing or malformed.
    InvalidParam,
    /// The task or parcel does not exist.
    NotFound,
    /// The status transition table forbids the change.
    InvalidTransition,
    /// The task status forbids binding parcels.
    NotBindable,
    /// A candidate parcel's status forbids binding to this task type.
    InvalidBinding,
    /// The requester is not the task's assigned driver or courier.
    NotOwned,
    /// Completion is blocked until every bound parcel is signed.
    UnsignedPackage,
    /// The parcel is not bound to the task.
    NotBound,
    /// Abnormality handling was requested for a task that is not abnormal.
    NotAbnormal,
    /// The persistence layer failed.
    Storage,
}

impl ErrorKind {
    /// Returns a stable snake-case code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidParam => "invalid_param",
            Self::NotFound => "not_found",
            Self::InvalidTransition => "invalid_transition",
            Self::NotBindable => "not_bindable",
            Self::InvalidBinding => "invalid_binding",
            Self::NotOwned => "not_owned",
            Self::UnsignedPackage => "unsigned_package",
            Self::NotBound => "not_bound",
            Self::NotAbnormal => "not_abnormal",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
