//! Step definitions for transport status synchronization scenarios.

mod given;
mod then;
mod when;
pub mod world;
