//! Building blocks shared by the parcel, transport, and delivery contexts.
//!
//! - [`state_machine`]: one transition-table validator for every task domain
//! - [`abnormal`]: abnormality value objects embedded in tasks
//! - [`propagation`]: best-effort parcel status propagation reports
//! - [`id_provider`]: business identifier generation
//! - [`error_kind`]: caller-facing error taxonomy
//! - [`postgres`]: blocking helpers for the Diesel adapters

pub mod abnormal;
pub mod error_kind;
pub mod id_provider;
pub mod postgres;
pub mod propagation;
pub mod state_machine;

pub use abnormal::{AbnormalInfo, AbnormalReport, PersistedAbnormalInfo};
pub use error_kind::ErrorKind;
pub use id_provider::{IdPrefix, IdProvider, TimestampIdProvider};
pub use propagation::{Propagated, PropagationFailure, PropagationReport};
pub use state_machine::{InvalidTransition, TaskStatus, parse_and_validate, validate_transition};

/// Returns the trimmed value, or `None` when it is blank.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
