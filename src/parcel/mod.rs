//! Parcel registry and sorting abnormal events.
//!
//! The registry owns parcel records, their append-only trace log and
//! abnormal records. It is the only path through which parcel status
//! changes; the transport and delivery coordinators call into it.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod tests;
