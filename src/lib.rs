//! Parcel Flow: parcel status synchronization across the logistics chain.
//!
//! Parcels move through collection and sorting, line-haul transport and
//! last-mile delivery. Transport and delivery tasks own their own lifecycle
//! and push derived statuses onto every parcel bound to them, so a parcel's
//! status always reflects the task currently carrying it.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`common`]: Task state machine, identifiers and shared value objects
//! - [`parcel`]: Parcel registry, trace log and sorting abnormal events
//! - [`transport`]: Line-haul transport tasks and parcel binding
//! - [`delivery`]: Delivery rounds, signatures and completion
//! - [`config`]: TOML configuration
//! - [`logging`]: `tracing` subscriber setup

pub mod common;
pub mod config;
pub mod delivery;
pub mod logging;
pub mod parcel;
pub mod transport;
