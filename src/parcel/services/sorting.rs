//! Abnormal events raised at the sorting centre.

use super::registry::{ParcelRegistry, ParcelRegistryError, ParcelRegistryResult};
use crate::common::IdPrefix;
use crate::parcel::{
    domain::{
        AbnormalRecord, AbnormalRecordId, NodeType, ParcelId, ParcelStatus, ParcelStatusUpdate,
        ParcelTrace, TraceEntry,
    },
    ports::{ParcelRepository, ParcelRepositoryError},
};
use mockable::Clock;
use tracing::info;

/// Abnormality category recorded for sorting events.
const SORTING_ABNORMAL_TYPE: &str = "sorting";

/// Node name written on sorting abnormal traces.
const SORTING_NODE_NAME: &str = "sorting center";

/// What a sorting abnormality left behind.
#[derive(Debug, Clone, PartialEq)]
pub struct SortingAbnormalOutcome {
    record: AbnormalRecord,
    trace: ParcelTrace,
}

impl SortingAbnormalOutcome {
    /// Returns the pending abnormal record.
    #[must_use]
    pub const fn record(&self) -> &AbnormalRecord {
        &self.record
    }

    /// Returns the abnormal trace entry.
    #[must_use]
    pub const fn trace(&self) -> &ParcelTrace {
        &self.trace
    }
}

/// Records and resolves sorting abnormalities.
pub struct SortingAbnormalRecorder<P, C>
where
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    registry: ParcelRegistry<P, C>,
}

impl<P, C> Clone for SortingAbnormalRecorder<P, C>
where
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<P, C> SortingAbnormalRecorder<P, C>
where
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    /// Creates a recorder working through `registry`.
    #[must_use]
    pub const fn new(registry: ParcelRegistry<P, C>) -> Self {
        Self { registry }
    }

    /// Marks a parcel abnormal during sorting.
    ///
    /// Any parcel may be flagged whatever its current status. The parcel is
    /// set to `abnormal`, a pending record of type `sorting` is opened and an
    /// abnormal trace is appended at the sorting centre.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError::NotFound`] when the parcel does not
    /// exist, or a repository error when a write fails.
    pub async fn handle_sorting_abnormal(
        &self,
        parcel_id: &ParcelId,
        reason: &str,
        handler: &str,
    ) -> ParcelRegistryResult<SortingAbnormalOutcome> {
        let update = ParcelStatusUpdate::new(ParcelStatus::Abnormal).with_abnormal(reason, handler);
        self.registry.update_status(parcel_id, &update).await?;

        let record_id = AbnormalRecordId::new(self.registry.next_id(IdPrefix::AbnormalRecord))?;
        let record = AbnormalRecord::open(
            record_id,
            parcel_id.clone(),
            SORTING_ABNORMAL_TYPE,
            reason.trim(),
            handler.trim(),
            self.registry.clock(),
        );
        self.registry
            .repository()
            .store_abnormal_record(&record)
            .await?;

        let entry = TraceEntry::new(NodeType::Abnormal, SORTING_NODE_NAME)
            .by(handler.trim())
            .remark(format!("sorting abnormal: {}", reason.trim()));
        let trace = self.registry.append_trace(parcel_id, entry).await?;

        info!(
            parcel_id = %parcel_id,
            record_id = %record.id(),
            "sorting abnormal recorded"
        );
        Ok(SortingAbnormalOutcome { record, trace })
    }

    /// Resolves a pending abnormal record.
    ///
    /// The parcel status is left as is; sorting sets it again once the
    /// parcel is back in the flow.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError::Repository`] when the record does not
    /// exist, or [`ParcelRegistryError::Domain`] when it is already resolved.
    pub async fn resolve(
        &self,
        record_id: &AbnormalRecordId,
        processing_method: &str,
        processor: &str,
    ) -> ParcelRegistryResult<AbnormalRecord> {
        let repository = self.registry.repository();
        let mut record = repository
            .find_abnormal_record(record_id)
            .await?
            .ok_or_else(|| {
                ParcelRegistryError::Repository(ParcelRepositoryError::AbnormalRecordNotFound(
                    record_id.clone(),
                ))
            })?;
        record.resolve(processing_method.trim(), processor, self.registry.clock())?;
        repository.update_abnormal_record(&record).await?;
        info!(record_id = %record_id, "abnormal record resolved");
        Ok(record)
    }

    /// Lists abnormal records raised against a parcel.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError::Repository`] when the lookup fails.
    pub async fn records_for(
        &self,
        parcel_id: &ParcelId,
    ) -> ParcelRegistryResult<Vec<AbnormalRecord>> {
        Ok(self
            .registry
            .repository()
            .abnormal_records_for(parcel_id)
            .await?)
    }
}
