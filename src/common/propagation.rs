//! Outcome of pushing a derived status onto bound parcels.
//!
//! Propagation is best-effort: a failed parcel update never aborts the task
//! operation that triggered it. Failures are collected here instead of being
//! dropped so callers can surface them as warnings and replay them.

use crate::parcel::domain::{ParcelId, ParcelStatusUpdate};

/// A single parcel update that did not apply.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationFailure {
    parcel_id: ParcelId,
    update: ParcelStatusUpdate,
    error: String,
}

impl PropagationFailure {
    /// Records a failed update.
    #[must_use]
    pub fn new(parcel_id: ParcelId, update: ParcelStatusUpdate, error: impl Into<String>) -> Self {
        Self {
            parcel_id,
            update,
            error: error.into(),
        }
    }

    /// Returns the parcel that was not updated.
    #[must_use]
    pub const fn parcel_id(&self) -> &ParcelId {
        &self.parcel_id
    }

    /// Returns the update that should have been applied.
    #[must_use]
    pub const fn update(&self) -> &ParcelStatusUpdate {
        &self.update
    }

    /// Returns the rendered cause.
    #[must_use]
    pub fn error(&self) -> &str {
        &self.error
    }
}

/// Summary of one propagation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropagationReport {
    updated: Vec<ParcelId>,
    failures: Vec<PropagationFailure>,
}

impl PropagationReport {
    /// Returns a report for a pass that touched no parcels.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn record_success(&mut self, parcel_id: ParcelId) {
        self.updated.push(parcel_id);
    }

    pub(crate) fn record_failure(&mut self, failure: PropagationFailure) {
        self.failures.push(failure);
    }

    /// Returns the parcels whose status was updated.
    #[must_use]
    pub fn updated(&self) -> &[ParcelId] {
        &self.updated
    }

    /// Returns updates that did not apply.
    #[must_use]
    pub fn failures(&self) -> &[PropagationFailure] {
        &self.failures
    }

    /// Returns whether every attempted update applied.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A task operation result paired with its propagation report.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagated<T> {
    value: T,
    report: PropagationReport,
}

impl<T> Propagated<T> {
    /// Pairs a value with its report.
    #[must_use]
    pub const fn new(value: T, report: PropagationReport) -> Self {
        Self { value, report }
    }

    /// Returns the operation result.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Returns the propagation report.
    #[must_use]
    pub const fn report(&self) -> &PropagationReport {
        &self.report
    }

    /// Splits into value and report.
    #[must_use]
    pub fn into_parts(self) -> (T, PropagationReport) {
        (self.value, self.report)
    }
}
