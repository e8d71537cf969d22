//! Step definitions for delivery signing scenarios.

mod given;
mod then;
mod when;
pub mod world;
