//! In-memory repository for transport tasks and bindings.

use async_trait::async_trait;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::parcel::domain::ParcelId;
use crate::transport::{
    domain::{TransportBinding, TransportStatus, TransportTask, TransportTaskId},
    ports::{TransportRepositoryError, TransportRepositoryResult, TransportTaskRepository},
};

/// Thread-safe in-memory transport task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTransportTaskRepository {
    state: Arc<RwLock<InMemoryTransportState>>,
}

#[derive(Debug, Default)]
struct InMemoryTransportState {
    tasks: HashMap<TransportTaskId, TransportTask>,
    bindings: HashMap<TransportTaskId, Vec<TransportBinding>>,
}

impl InMemoryTransportTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> TransportRepositoryResult<RwLockReadGuard<'_, InMemoryTransportState>> {
        self.state.read().map_err(|err| {
            TransportRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TransportRepositoryResult<RwLockWriteGuard<'_, InMemoryTransportState>> {
        self.state.write().map_err(|err| {
            TransportRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl TransportTaskRepository for InMemoryTransportTaskRepository {
    async fn store(&self, task: &TransportTask) -> TransportRepositoryResult<()> {
        let mut state = self.write()?;
        if state.tasks.contains_key(task.id()) {
            return Err(TransportRepositoryError::DuplicateTask(task.id().clone()));
        }
        state.tasks.insert(task.id().clone(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &TransportTask) -> TransportRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .tasks
            .get_mut(task.id())
            .ok_or_else(|| TransportRepositoryError::NotFound(task.id().clone()))?;
        *stored = task.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &TransportTaskId,
    ) -> TransportRepositoryResult<Option<TransportTask>> {
        let state = self.read()?;
        Ok(state.tasks.get(id).cloned())
    }

    async fn find_by_driver(
        &self,
        driver_id: &str,
        status: Option<TransportStatus>,
    ) -> TransportRepositoryResult<Vec<TransportTask>> {
        let state = self.read()?;
        let mut tasks: Vec<TransportTask> = state
            .tasks
            .values()
            .filter(|task| task.is_driven_by(driver_id))
            .filter(|task| status.is_none_or(|wanted| task.status() == wanted))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| Reverse((task.created_at(), task.id().clone())));
        Ok(tasks)
    }

    async fn bound_parcel_ids(
        &self,
        id: &TransportTaskId,
    ) -> TransportRepositoryResult<Vec<ParcelId>> {
        let state = self.read()?;
        Ok(state
            .bindings
            .get(id)
            .map(|bindings| {
                bindings
                    .iter()
                    .map(|binding| binding.parcel_id().clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_bindings(
        &self,
        bindings: &[TransportBinding],
    ) -> TransportRepositoryResult<()> {
        let mut state = self.write()?;
        for (index, binding) in bindings.iter().enumerate() {
            let already_stored = state.bindings.get(binding.task_id()).is_some_and(|stored| {
                stored
                    .iter()
                    .any(|existing| existing.parcel_id() == binding.parcel_id())
            });
            let repeated_in_batch = bindings.iter().take(index).any(|earlier| {
                earlier.task_id() == binding.task_id() && earlier.parcel_id() == binding.parcel_id()
            });
            if already_stored || repeated_in_batch {
                return Err(TransportRepositoryError::DuplicateBinding {
                    task_id: binding.task_id().clone(),
                    parcel_id: binding.parcel_id().clone(),
                });
            }
        }
        for binding in bindings {
            state
                .bindings
                .entry(binding.task_id().clone())
                .or_default()
                .push(binding.clone());
        }
        Ok(())
    }

    async fn count_bindings(&self, id: &TransportTaskId) -> TransportRepositoryResult<u32> {
        let state = self.read()?;
        let count = state.bindings.get(id).map_or(0, Vec::len);
        u32::try_from(count).map_err(TransportRepositoryError::persistence)
    }
}
