//! Shared world state for transport status synchronization scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use parcel_flow::{
    common::ErrorKind,
    parcel::{adapters::memory::InMemoryParcelRepository, services::ParcelRegistry},
    transport::{
        adapters::memory::InMemoryTransportTaskRepository, domain::TransportTask,
        services::TransportCoordinator,
    },
};
use rstest::fixture;

/// Registry type used by the BDD world.
pub type TestRegistry = ParcelRegistry<InMemoryParcelRepository, DefaultClock>;

/// Coordinator type used by the BDD world.
pub type TestCoordinator =
    TransportCoordinator<InMemoryTransportTaskRepository, InMemoryParcelRepository, DefaultClock>;

/// Scenario world for transport status behaviour tests.
pub struct TransportWorld {
    pub registry: TestRegistry,
    pub coordinator: TestCoordinator,
    pub parcel_ids: Vec<String>,
    pub task: Option<TransportTask>,
    pub last_error: Option<ErrorKind>,
}

impl TransportWorld {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        let registry = ParcelRegistry::new(
            Arc::new(InMemoryParcelRepository::new()),
            Arc::new(DefaultClock),
        );
        let coordinator = TransportCoordinator::new(
            Arc::new(InMemoryTransportTaskRepository::new()),
            registry.clone(),
        );

        Self {
            registry,
            coordinator,
            parcel_ids: Vec::new(),
            task: None,
            last_error: None,
        }
    }

    /// Returns the task created by the background.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn task(&self) -> Result<&TransportTask, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing transport task in scenario world"))
    }
}

impl Default for TransportWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TransportWorld {
    TransportWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
