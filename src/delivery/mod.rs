//! Last-mile delivery rounds.
//!
//! A delivery task hands arrived parcels to one courier in a fixed order.
//! Going out for delivery and completing the round are mirrored onto the
//! bound parcels; each signature marks its parcel delivered at once.
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
