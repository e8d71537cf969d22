//! In-memory repository for delivery tasks and bindings.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::delivery::{
    domain::{DeliveryBinding, DeliveryStatus, DeliveryTask, DeliveryTaskId},
    ports::{DeliveryRepositoryError, DeliveryRepositoryResult, DeliveryTaskRepository},
};
use crate::parcel::domain::ParcelId;

/// Thread-safe in-memory delivery task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDeliveryTaskRepository {
    state: Arc<RwLock<InMemoryDeliveryState>>,
}

#[derive(Debug, Default)]
struct InMemoryDeliveryState {
    tasks: HashMap<DeliveryTaskId, DeliveryTask>,
    bindings: HashMap<DeliveryTaskId, Vec<DeliveryBinding>>,
}

impl InMemoryDeliveryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DeliveryRepositoryResult<RwLockReadGuard<'_, InMemoryDeliveryState>> {
        self.state.read().map_err(|err| {
            DeliveryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> DeliveryRepositoryResult<RwLockWriteGuard<'_, InMemoryDeliveryState>> {
        self.state.write().map_err(|err| {
            DeliveryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl DeliveryTaskRepository for InMemoryDeliveryTaskRepository {
    async fn store(&self, task: &DeliveryTask) -> DeliveryRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(task.id()) {
            return Err(DeliveryRepositoryError::DuplicateTask(task.id().clone()));
        }
        state.tasks.insert(task.id().clone(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &DeliveryTask) -> DeliveryRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(task.id())
            .ok_or_else(|| DeliveryRepositoryError::NotFound(task.id().clone()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &DeliveryTaskId,
    ) -> DeliveryRepositoryResult<Option<DeliveryTask>> {
        let state = self.read()?;
        Ok(state.tasks.get(id).cloned())
    }

    async fn find_by_courier(
        &self,
        courier_id: &str,
        status: Option<DeliveryStatus>,
    ) -> DeliveryRepositoryResult<Vec<DeliveryTask>> {
        let state = self.read()?;
        let mut tasks: Vec<DeliveryTask> = state
            .tasks
            .values()
            .filter(|task| task.is_assigned_to(courier_id))
            .filter(|task| status.is_none_or(|wanted| task.status() == wanted))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| Reverse((task.created_at(), task.id().clone())));
        Ok(tasks)
    }

    async fn replace_bindings(
        &self,
        id: &DeliveryTaskId,
        bindings: &[DeliveryBinding],
    ) -> DeliveryRepositoryResult<()> {
        let mut state = self.write()?;
        state.bindings.insert(id.clone(), bindings.to_vec());
        Ok(())
    }

    async fn bindings_for(
        &self,
        id: &DeliveryTaskId,
    ) -> DeliveryRepositoryResult<Vec<DeliveryBinding>> {
        let state = self.read()?;
        let mut bindings = state.bindings.get(id).cloned().unwrap_or_default();
        bindings.sort_by_key(DeliveryBinding::delivery_order);
        Ok(bindings)
    }

    async fn find_binding(
        &self,
        id: &DeliveryTaskId,
        parcel_id: &ParcelId,
    ) -> DeliveryRepositoryResult<Option<DeliveryBinding>> {
        let state = self.read()?;
        Ok(state.bindings.get(id).and_then(|bindings| {
            bindings
                .iter()
                .find(|binding| binding.parcel_id() == parcel_id)
                .cloned()
        }))
    }

    async fn update_binding(&self, binding: &DeliveryBinding) -> DeliveryRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .bindings
            .get_mut(binding.task_id())
            .and_then(|bindings| {
                bindings
                    .iter_mut()
                    .find(|existing| existing.parcel_id() == binding.parcel_id())
            })
            .ok_or_else(|| DeliveryRepositoryError::BindingNotFound {
                task_id: binding.task_id().clone(),
                parcel_id: binding.parcel_id().clone(),
            })?;
        *stored = binding.clone();
        Ok(())
    }

    async fn count_bindings(&self, id: &DeliveryTaskId) -> DeliveryRepositoryResult<u32> {
        let state = self.read()?;
        let count = state.bindings.get(id).map_or(0, Vec::len);
        u32::try_from(count).map_err(DeliveryRepositoryError::persistence)
    }
}
