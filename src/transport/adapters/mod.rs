//! Adapter implementations for the transport coordinator.

pub mod memory;
pub mod postgres;
