//! Adapter implementations for the delivery coordinator.

pub mod memory;
pub mod postgres;
