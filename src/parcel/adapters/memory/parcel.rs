//! In-memory repository for parcels, traces and abnormal records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::parcel::{
    domain::{
        AbnormalRecord, AbnormalRecordId, Parcel, ParcelId, ParcelStatusUpdate, ParcelTrace,
        TraceId,
    },
    ports::{ParcelRepository, ParcelRepositoryError, ParcelRepositoryResult},
};

/// Thread-safe in-memory parcel repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryParcelRepository {
    state: Arc<RwLock<InMemoryParcelState>>,
}

#[derive(Debug, Default)]
struct InMemoryParcelState {
    parcels: HashMap<ParcelId, Parcel>,
    traces: HashMap<ParcelId, Vec<ParcelTrace>>,
    trace_ids: HashSet<TraceId>,
    abnormal_records: HashMap<AbnormalRecordId, AbnormalRecord>,
}

impl InMemoryParcelRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ParcelRepositoryResult<RwLockReadGuard<'_, InMemoryParcelState>> {
        self.state.read().map_err(|err| {
            ParcelRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ParcelRepositoryResult<RwLockWriteGuard<'_, InMemoryParcelState>> {
        self.state.write().map_err(|err| {
            ParcelRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

fn live_parcel_mut<'a>(
    state: &'a mut InMemoryParcelState,
    id: &ParcelId,
) -> ParcelRepositoryResult<&'a mut Parcel> {
    state
        .parcels
        .get_mut(id)
        .filter(|parcel| !parcel.is_deleted())
        .ok_or_else(|| ParcelRepositoryError::NotFound(id.clone()))
}

#[async_trait]
impl ParcelRepository for InMemoryParcelRepository {
    async fn store(&self, parcel: &Parcel) -> ParcelRepositoryResult<()> {
        let mut state = self.write()?;
        if state.parcels.contains_key(parcel.id()) {
            return Err(ParcelRepositoryError::DuplicateParcel(parcel.id().clone()));
        }
        state.parcels.insert(parcel.id().clone(), parcel.clone());
        Ok(())
    }

    async fn update(&self, parcel: &Parcel) -> ParcelRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = live_parcel_mut(&mut state, parcel.id())?;
        *stored = parcel.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &ParcelId) -> ParcelRepositoryResult<Option<Parcel>> {
        let state = self.read()?;
        Ok(state
            .parcels
            .get(id)
            .filter(|parcel| !parcel.is_deleted())
            .cloned())
    }

    async fn update_status(
        &self,
        id: &ParcelId,
        update: &ParcelStatusUpdate,
        at: DateTime<Utc>,
    ) -> ParcelRepositoryResult<()> {
        let mut state = self.write()?;
        live_parcel_mut(&mut state, id)?.apply_status_update(update, at);
        Ok(())
    }

    async fn append_trace(&self, trace: &ParcelTrace) -> ParcelRepositoryResult<()> {
        let mut state = self.write()?;
        if !state.trace_ids.insert(trace.id().clone()) {
            return Err(ParcelRepositoryError::DuplicateTrace(trace.id().clone()));
        }
        state
            .traces
            .entry(trace.parcel_id().clone())
            .or_default()
            .push(trace.clone());
        Ok(())
    }

    async fn traces_for(&self, id: &ParcelId) -> ParcelRepositoryResult<Vec<ParcelTrace>> {
        let state = self.read()?;
        let mut traces = state.traces.get(id).cloned().unwrap_or_default();
        traces.sort_by_key(ParcelTrace::operated_at);
        Ok(traces)
    }

    async fn store_abnormal_record(&self, record: &AbnormalRecord) -> ParcelRepositoryResult<()> {
        let mut state = self.write()?;
        if state.abnormal_records.contains_key(record.id()) {
            return Err(ParcelRepositoryError::DuplicateAbnormalRecord(
                record.id().clone(),
            ));
        }
        state
            .abnormal_records
            .insert(record.id().clone(), record.clone());
        Ok(())
    }

    async fn update_abnormal_record(&self, record: &AbnormalRecord) -> ParcelRepositoryResult<()> {
        let mut state = self.write()?;
        let stored = state
            .abnormal_records
            .get_mut(record.id())
            .ok_or_else(|| ParcelRepositoryError::AbnormalRecordNotFound(record.id().clone()))?;
        *stored = record.clone();
        Ok(())
    }

    async fn find_abnormal_record(
        &self,
        id: &AbnormalRecordId,
    ) -> ParcelRepositoryResult<Option<AbnormalRecord>> {
        let state = self.read()?;
        Ok(state.abnormal_records.get(id).cloned())
    }

    async fn abnormal_records_for(
        &self,
        id: &ParcelId,
    ) -> ParcelRepositoryResult<Vec<AbnormalRecord>> {
        let state = self.read()?;
        let mut records: Vec<AbnormalRecord> = state
            .abnormal_records
            .values()
            .filter(|record| record.parcel_id() == id)
            .cloned()
            .collect();
        records.sort_by(|left, right| {
            left.created_at()
                .cmp(&right.created_at())
                .then_with(|| left.id().as_str().cmp(right.id().as_str()))
        });
        Ok(records)
    }
}
