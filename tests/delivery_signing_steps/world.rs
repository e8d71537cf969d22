//! Shared world state for delivery signing scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use parcel_flow::{
    common::ErrorKind,
    delivery::{
        adapters::memory::InMemoryDeliveryTaskRepository, domain::DeliveryTask,
        services::DeliveryCoordinator,
    },
    parcel::{adapters::memory::InMemoryParcelRepository, services::ParcelRegistry},
};
use rstest::fixture;

/// Coordinator type used by the BDD world.
pub type TestCoordinator =
    DeliveryCoordinator<InMemoryDeliveryTaskRepository, InMemoryParcelRepository, DefaultClock>;

/// Scenario world for delivery signing behaviour tests.
pub struct DeliveryWorld {
    pub registry: ParcelRegistry<InMemoryParcelRepository, DefaultClock>,
    pub coordinator: TestCoordinator,
    pub task: Option<DeliveryTask>,
    pub last_error: Option<ErrorKind>,
}

impl DeliveryWorld {
    /// Creates a world with empty stores.
    #[must_use]
    pub fn new() -> Self {
        let registry = ParcelRegistry::new(
            Arc::new(InMemoryParcelRepository::new()),
            Arc::new(DefaultClock),
        );
        let coordinator = DeliveryCoordinator::new(
            Arc::new(InMemoryDeliveryTaskRepository::new()),
            registry.clone(),
        );

        Self {
            registry,
            coordinator,
            task: None,
            last_error: None,
        }
    }

    /// Returns the round created by the background.
    ///
    /// # Errors
    ///
    /// Returns an error when no round has been created yet.
    pub fn task(&self) -> Result<&DeliveryTask, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing delivery round in scenario world"))
    }
}

impl Default for DeliveryWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DeliveryWorld {
    DeliveryWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
