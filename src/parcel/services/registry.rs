//! Parcel registry: the sole owner of parcel status.
//!
//! Coordinators never touch parcel fields directly; every status change goes
//! through [`ParcelRegistry::update_status`] or its batch form
//! [`ParcelRegistry::propagate`].

use crate::common::{
    ErrorKind, IdPrefix, IdProvider, PropagationFailure, PropagationReport, TimestampIdProvider,
};
use crate::parcel::{
    adapters::memory::NullGeocoder,
    domain::{
        Contact, Dimensions, GeoPoint, NodeType, Parcel, ParcelDomainError, ParcelId,
        ParcelStatus, ParcelStatusUpdate, ParcelTrace, ParseParcelStatusError, Region,
        TraceEntry, TraceId,
    },
    ports::{Geocoder, ParcelRepository, ParcelRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Remark written on the collection trace of a new parcel.
const COLLECTED_REMARK: &str = "parcel collected";

/// Request payload for registering a collected parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateParcelRequest {
    parcel_id: Option<String>,
    sender: Contact,
    receiver: Contact,
    receiver_region: Region,
    dimensions: Dimensions,
    operator: String,
    node_name: String,
    node_address: String,
}

impl CreateParcelRequest {
    /// Creates a request with the required parcel fields.
    #[must_use]
    pub fn new(
        sender: Contact,
        receiver: Contact,
        receiver_region: Region,
        dimensions: Dimensions,
    ) -> Self {
        Self {
            parcel_id: None,
            sender,
            receiver,
            receiver_region,
            dimensions,
            operator: String::new(),
            node_name: String::new(),
            node_address: String::new(),
        }
    }

    /// Uses a caller-assigned tracking number instead of generating one.
    #[must_use]
    pub fn with_parcel_id(mut self, parcel_id: impl Into<String>) -> Self {
        self.parcel_id = Some(parcel_id.into());
        self
    }

    /// Sets where and by whom the parcel was collected.
    #[must_use]
    pub fn collected_at(
        mut self,
        operator: impl Into<String>,
        node_name: impl Into<String>,
        node_address: impl Into<String>,
    ) -> Self {
        self.operator = operator.into();
        self.node_name = node_name.into();
        self.node_address = node_address.into();
        self
    }
}

/// A parcel together with its trace history.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelDetails {
    parcel: Parcel,
    traces: Vec<ParcelTrace>,
}

impl ParcelDetails {
    /// Returns the parcel.
    #[must_use]
    pub const fn parcel(&self) -> &Parcel {
        &self.parcel
    }

    /// Returns trace entries ordered by operation time.
    #[must_use]
    pub fn traces(&self) -> &[ParcelTrace] {
        &self.traces
    }

    /// Returns the node of the most recent trace entry.
    #[must_use]
    pub fn current_position(&self) -> Option<&str> {
        self.traces.last().map(ParcelTrace::node_name)
    }
}

/// Service-level errors for parcel registry operations.
#[derive(Debug, Error)]
pub enum ParcelRegistryError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ParcelDomainError),
    /// The requested status string is blank or unknown.
    #[error(transparent)]
    InvalidStatus(#[from] ParseParcelStatusError),
    /// The parcel does not exist.
    #[error("parcel not found: {0}")]
    NotFound(ParcelId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ParcelRepositoryError),
}

impl ParcelRegistryError {
    /// Classifies the error for the calling layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) | Self::InvalidStatus(_) => ErrorKind::InvalidParam,
            Self::NotFound(_)
            | Self::Repository(
                ParcelRepositoryError::NotFound(_)
                | ParcelRepositoryError::AbnormalRecordNotFound(_),
            ) => ErrorKind::NotFound,
            Self::Repository(_) => ErrorKind::Storage,
        }
    }
}

/// Result type for parcel registry operations.
pub type ParcelRegistryResult<T> = Result<T, ParcelRegistryError>;

/// Parcel registry service.
pub struct ParcelRegistry<P, C>
where
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<P>,
    clock: Arc<C>,
    geocoder: Arc<dyn Geocoder>,
    ids: Arc<dyn IdProvider>,
}

impl<P, C> Clone for ParcelRegistry<P, C>
where
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            geocoder: Arc::clone(&self.geocoder),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<P, C> ParcelRegistry<P, C>
where
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    /// Creates a registry with no geocoding and timestamped identifiers.
    #[must_use]
    pub fn new(repository: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            geocoder: Arc::new(NullGeocoder),
            ids: Arc::new(TimestampIdProvider::new()),
        }
    }

    /// Replaces the geocoder used to locate collection nodes.
    #[must_use]
    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = geocoder;
        self
    }

    /// Replaces the identifier source.
    #[must_use]
    pub fn with_id_provider(mut self, ids: Arc<dyn IdProvider>) -> Self {
        self.ids = ids;
        self
    }

    pub(crate) fn repository(&self) -> &P {
        &self.repository
    }

    pub(crate) fn clock(&self) -> &C {
        &self.clock
    }

    pub(crate) fn next_id(&self, prefix: IdPrefix) -> String {
        self.ids.next_id(prefix, self.clock.utc())
    }

    /// Registers a collected parcel and records its collection trace.
    ///
    /// A geocoding failure stamps the trace with [`GeoPoint::UNKNOWN`].
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError`] when the tracking number is invalid or
    /// the repository rejects the parcel or trace.
    pub async fn create_parcel(
        &self,
        request: CreateParcelRequest,
    ) -> ParcelRegistryResult<Parcel> {
        let raw_id = match request.parcel_id.as_deref().map(str::trim) {
            Some(given) if !given.is_empty() => given.to_owned(),
            _ => self.next_id(IdPrefix::Parcel),
        };
        let parcel = Parcel::collect(
            ParcelId::new(raw_id)?,
            request.sender,
            request.receiver,
            request.receiver_region,
            request.dimensions,
            &*self.clock,
        );
        self.repository.store(&parcel).await?;

        let location = match self.geocoder.coordinates_for(&request.node_address).await {
            Ok(point) => point,
            Err(err) => {
                warn!(
                    parcel_id = %parcel.id(),
                    address = %request.node_address,
                    error = %err,
                    "geocoding failed, recording unknown location"
                );
                GeoPoint::UNKNOWN
            }
        };
        let entry = TraceEntry::new(NodeType::Collection, request.node_name)
            .at(request.node_address, location)
            .by(request.operator)
            .remark(COLLECTED_REMARK);
        self.append_trace(parcel.id(), entry).await?;

        info!(parcel_id = %parcel.id(), "parcel collected");
        Ok(parcel)
    }

    /// Finds a live parcel.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError::Repository`] when the lookup fails.
    pub async fn find(&self, id: &ParcelId) -> ParcelRegistryResult<Option<Parcel>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Loads a live parcel.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError::NotFound`] when the parcel does not
    /// exist.
    pub async fn get(&self, id: &ParcelId) -> ParcelRegistryResult<Parcel> {
        self.find(id)
            .await?
            .ok_or_else(|| ParcelRegistryError::NotFound(id.clone()))
    }

    /// Loads a parcel with its trace history.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError::NotFound`] when the parcel does not
    /// exist.
    pub async fn parcel_detail(&self, id: &ParcelId) -> ParcelRegistryResult<ParcelDetails> {
        let parcel = self.get(id).await?;
        let traces = self.repository.traces_for(id).await?;
        Ok(ParcelDetails { parcel, traces })
    }

    /// Sets a parcel status from its string form, as sorting does.
    ///
    /// The status is not checked against the current one.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError::InvalidStatus`] for an unknown status
    /// or [`ParcelRegistryError::NotFound`] when the parcel does not exist.
    pub async fn change_status(&self, id: &ParcelId, status: &str) -> ParcelRegistryResult<()> {
        let parsed = ParcelStatus::try_from(status)?;
        self.update_status(id, &ParcelStatusUpdate::new(parsed)).await
    }

    /// Applies a derived status update to one parcel.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError::NotFound`] when the parcel does not
    /// exist.
    pub async fn update_status(
        &self,
        id: &ParcelId,
        update: &ParcelStatusUpdate,
    ) -> ParcelRegistryResult<()> {
        self.repository
            .update_status(id, update, self.clock.utc())
            .await
            .map_err(|err| match err {
                ParcelRepositoryError::NotFound(missing) => ParcelRegistryError::NotFound(missing),
                other => ParcelRegistryError::Repository(other),
            })?;
        info!(parcel_id = %id, status = %update.status(), "parcel status updated");
        Ok(())
    }

    /// Pushes `update` onto every parcel in `parcel_ids`.
    ///
    /// Failures never stop the pass; they are logged and returned in the
    /// report.
    pub async fn propagate(
        &self,
        parcel_ids: &[ParcelId],
        update: &ParcelStatusUpdate,
    ) -> PropagationReport {
        let mut report = PropagationReport::empty();
        for id in parcel_ids {
            self.propagate_one(&mut report, id, update).await;
        }
        report
    }

    /// Re-applies the failed updates of an earlier pass.
    pub async fn replay(&self, previous: &PropagationReport) -> PropagationReport {
        let mut report = PropagationReport::empty();
        for failure in previous.failures() {
            self.propagate_one(&mut report, failure.parcel_id(), failure.update())
                .await;
        }
        report
    }

    async fn propagate_one(
        &self,
        report: &mut PropagationReport,
        id: &ParcelId,
        update: &ParcelStatusUpdate,
    ) {
        match self.update_status(id, update).await {
            Ok(()) => report.record_success(id.clone()),
            Err(err) => {
                warn!(
                    parcel_id = %id,
                    status = %update.status(),
                    error = %err,
                    "parcel status propagation failed"
                );
                report.record_failure(PropagationFailure::new(
                    id.clone(),
                    update.clone(),
                    err.to_string(),
                ));
            }
        }
    }

    /// Appends an operational event to a parcel's trace.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError::Repository`] when the entry cannot be
    /// stored.
    pub async fn append_trace(
        &self,
        id: &ParcelId,
        entry: TraceEntry,
    ) -> ParcelRegistryResult<ParcelTrace> {
        let trace_id = TraceId::new(self.next_id(IdPrefix::Trace))?;
        let trace = ParcelTrace::record(trace_id, id.clone(), entry, self.clock.utc());
        self.repository.append_trace(&trace).await?;
        Ok(trace)
    }

    /// Soft-deletes a parcel.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelRegistryError::NotFound`] when the parcel does not
    /// exist.
    pub async fn archive(&self, id: &ParcelId) -> ParcelRegistryResult<Parcel> {
        let mut parcel = self.get(id).await?;
        parcel.mark_deleted(&*self.clock);
        self.repository.update(&parcel).await?;
        info!(parcel_id = %id, "parcel archived");
        Ok(parcel)
    }
}
