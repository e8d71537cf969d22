//! Transport legs between network nodes.
//!
//! A transport task binds sorted parcels and carries them from one node to
//! another. Departure and arrival are mirrored onto every bound parcel
//! through the parcel registry.
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
mod tests;
