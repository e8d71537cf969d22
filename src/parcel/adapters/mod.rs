//! Adapter implementations for the parcel registry ports.

pub mod memory;
pub mod postgres;
