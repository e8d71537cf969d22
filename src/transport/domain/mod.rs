//! Domain model for transport legs between network nodes.
//!
//! A transport task carries a batch of sorted parcels between two nodes on
//! one vehicle. Its status follows a fixed transition table; entering
//! `transporting` or `arrived` is mirrored onto every bound parcel.

mod error;
mod ids;
mod route;
mod status;
mod task;

pub use error::{ParseTransportStatusError, TransportDomainError};
pub use ids::TransportTaskId;
pub use route::TransportRoute;
pub use status::TransportStatus;
pub use task::{PersistedTransportTaskData, TransportBinding, TransportPlan, TransportTask};
