//! Transport coordinator: task lifecycle, parcel binding and status
//! propagation onto bound parcels.

use crate::common::{
    AbnormalReport, ErrorKind, IdPrefix, IdProvider, Propagated, PropagationReport,
    TimestampIdProvider, parse_and_validate,
};
use crate::parcel::{
    domain::{Parcel, ParcelId, ParcelStatus, ParcelStatusUpdate},
    ports::ParcelRepository,
    services::{ParcelRegistry, ParcelRegistryError},
};
use crate::transport::{
    domain::{
        TransportBinding, TransportDomainError, TransportPlan, TransportRoute, TransportStatus,
        TransportTask, TransportTaskId,
    },
    ports::{TransportRepositoryError, TransportTaskRepository},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Bindings inserted per repository call unless configured otherwise.
pub const DEFAULT_BIND_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Request payload for planning a transport leg.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransportTaskRequest {
    start_node: String,
    end_node: String,
    vehicle_id: String,
    driver_id: String,
    driver_name: String,
    estimated_arrival: Option<DateTime<Utc>>,
    route_json: String,
    distance_km: f64,
}

impl CreateTransportTaskRequest {
    /// Creates a request for a leg between two nodes on one vehicle.
    #[must_use]
    pub fn new(
        start_node: impl Into<String>,
        end_node: impl Into<String>,
        vehicle_id: impl Into<String>,
    ) -> Self {
        Self {
            start_node: start_node.into(),
            end_node: end_node.into(),
            vehicle_id: vehicle_id.into(),
            driver_id: String::new(),
            driver_name: String::new(),
            estimated_arrival: None,
            route_json: String::new(),
            distance_km: 0.0,
        }
    }

    /// Assigns a driver.
    #[must_use]
    pub fn with_driver(
        mut self,
        driver_id: impl Into<String>,
        driver_name: impl Into<String>,
    ) -> Self {
        self.driver_id = driver_id.into();
        self.driver_name = driver_name.into();
        self
    }

    /// Sets the estimated arrival time.
    #[must_use]
    pub const fn with_estimated_arrival(mut self, estimated_arrival: DateTime<Utc>) -> Self {
        self.estimated_arrival = Some(estimated_arrival);
        self
    }

    /// Sets the JSON waypoint description and distance.
    #[must_use]
    pub fn with_route(mut self, route_json: impl Into<String>, distance_km: f64) -> Self {
        self.route_json = route_json.into();
        self.distance_km = distance_km;
        self
    }
}

/// Service-level errors for transport operations.
#[derive(Debug, Error)]
pub enum TransportCoordinatorError {
    /// A required input was blank.
    #[error("{0} must not be empty")]
    InvalidParam(&'static str),
    /// The transport task does not exist.
    #[error("transport task not found: {0}")]
    TaskNotFound(TransportTaskId),
    /// A candidate parcel does not exist.
    #[error("parcel not found: {0}")]
    ParcelNotFound(ParcelId),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TransportDomainError),
    /// A candidate parcel is not ready for transport.
    #[error("parcel {parcel_id} is {status}, only sorted parcels can be bound")]
    InvalidBinding {
        /// The rejected parcel.
        parcel_id: ParcelId,
        /// Its current status.
        status: ParcelStatus,
    },
    /// The requester does not drive this task.
    #[error("transport task {task_id} is not assigned to driver {driver_id}")]
    NotOwned {
        /// The requested task.
        task_id: TransportTaskId,
        /// The requesting driver.
        driver_id: String,
    },
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TransportRepositoryError),
    /// Parcel registry operation failed.
    #[error(transparent)]
    Parcel(#[from] ParcelRegistryError),
}

impl TransportCoordinatorError {
    /// Classifies the error for the calling layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParam(_)
            | Self::Domain(
                TransportDomainError::EmptyTaskId
                | TransportDomainError::TaskIdTooLong(_)
                | TransportDomainError::MissingField(_)
                | TransportDomainError::InvalidRoute(_)
                | TransportDomainError::InvalidDistance,
            ) => ErrorKind::InvalidParam,
            Self::TaskNotFound(_)
            | Self::ParcelNotFound(_)
            | Self::Repository(TransportRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Domain(TransportDomainError::InvalidTransition(_)) => {
                ErrorKind::InvalidTransition
            }
            Self::Domain(TransportDomainError::NotBindable(_)) => ErrorKind::NotBindable,
            Self::Domain(TransportDomainError::NotAbnormal(_)) => ErrorKind::NotAbnormal,
            Self::InvalidBinding { .. } => ErrorKind::InvalidBinding,
            Self::NotOwned { .. } => ErrorKind::NotOwned,
            Self::Repository(_) => ErrorKind::Storage,
            Self::Parcel(err) => err.kind(),
        }
    }
}

/// Result type for transport coordinator operations.
pub type TransportCoordinatorResult<T> = Result<T, TransportCoordinatorError>;

/// Transport coordinator service.
pub struct TransportCoordinator<T, P, C>
where
    T: TransportTaskRepository,
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    parcels: ParcelRegistry<P, C>,
    ids: Arc<dyn IdProvider>,
    batch_size: NonZeroUsize,
}

impl<T, P, C> Clone for TransportCoordinator<T, P, C>
where
    T: TransportTaskRepository,
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            parcels: self.parcels.clone(),
            ids: Arc::clone(&self.ids),
            batch_size: self.batch_size,
        }
    }
}

impl<T, P, C> TransportCoordinator<T, P, C>
where
    T: TransportTaskRepository,
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator updating parcels through `parcels`.
    #[must_use]
    pub fn new(tasks: Arc<T>, parcels: ParcelRegistry<P, C>) -> Self {
        Self {
            tasks,
            parcels,
            ids: Arc::new(TimestampIdProvider::new()),
            batch_size: DEFAULT_BIND_BATCH_SIZE,
        }
    }

    /// Replaces the identifier source.
    #[must_use]
    pub fn with_id_provider(mut self, ids: Arc<dyn IdProvider>) -> Self {
        self.ids = ids;
        self
    }

    /// Sets how many bindings are inserted per repository call.
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    fn clock(&self) -> &C {
        self.parcels.clock()
    }

    /// Plans a new transport leg in `pending` status.
    ///
    /// # Errors
    ///
    /// Returns [`TransportCoordinatorError::Domain`] when a node or the
    /// vehicle is blank or the route is malformed.
    pub async fn create_task(
        &self,
        request: CreateTransportTaskRequest,
    ) -> TransportCoordinatorResult<TransportTask> {
        let route = TransportRoute::new(&request.route_json, request.distance_km)?;
        let mut plan =
            TransportPlan::new(&request.start_node, &request.end_node, &request.vehicle_id)?
                .with_driver(&request.driver_id, &request.driver_name)
                .with_route(route);
        if let Some(estimated_arrival) = request.estimated_arrival {
            plan = plan.with_estimated_arrival(estimated_arrival);
        }
        let id = TransportTaskId::new(
            self.ids
                .next_id(IdPrefix::TransportTask, self.clock().utc()),
        )?;
        let task = TransportTask::new(id, plan, self.clock());
        self.tasks.store(&task).await?;
        info!(task_id = %task.id(), vehicle_id = task.vehicle_id(), "transport task created");
        Ok(task)
    }

    /// Loads a transport task.
    ///
    /// # Errors
    ///
    /// Returns [`TransportCoordinatorError::TaskNotFound`] when the task does
    /// not exist.
    pub async fn get_task(
        &self,
        id: &TransportTaskId,
    ) -> TransportCoordinatorResult<TransportTask> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| TransportCoordinatorError::TaskNotFound(id.clone()))
    }

    /// Moves a task to `status` and mirrors departure or arrival onto its
    /// bound parcels.
    ///
    /// # Errors
    ///
    /// Returns [`TransportCoordinatorError::InvalidParam`] for a blank
    /// status, [`TransportCoordinatorError::TaskNotFound`] when the task does
    /// not exist, or [`TransportDomainError::InvalidTransition`] when the
    /// transition table forbids the change. Parcel update failures are
    /// reported, not returned.
    pub async fn change_status(
        &self,
        id: &TransportTaskId,
        status: &str,
    ) -> TransportCoordinatorResult<Propagated<TransportTask>> {
        if status.trim().is_empty() {
            return Err(TransportCoordinatorError::InvalidParam("status"));
        }
        let mut task = self.get_task(id).await?;
        let requested =
            parse_and_validate(task.status(), status).map_err(TransportDomainError::from)?;
        let previous = task.status();
        task.change_status(requested, self.clock())?;
        self.tasks.update(&task).await?;
        info!(task_id = %id, from = %previous, to = %requested, "transport status changed");

        let report = self.propagate_status(&task).await?;
        Ok(Propagated::new(task, report))
    }

    /// Binds sorted parcels to a pending or transporting task.
    ///
    /// Every non-blank candidate must be sorted, including parcels already
    /// bound to the task. Blank candidates and repeats within the call are
    /// skipped; already bound parcels are skipped once validation passes.
    /// Nothing is written unless every candidate is valid.
    ///
    /// # Errors
    ///
    /// Returns [`TransportCoordinatorError::TaskNotFound`] when the task does
    /// not exist, [`TransportDomainError::NotBindable`] when its status
    /// forbids binding, [`TransportCoordinatorError::ParcelNotFound`] or
    /// [`TransportCoordinatorError::InvalidBinding`] for a candidate that is
    /// missing or not sorted.
    pub async fn bind_packages(
        &self,
        id: &TransportTaskId,
        parcel_ids: &[String],
    ) -> TransportCoordinatorResult<TransportTask> {
        let mut task = self.get_task(id).await?;
        task.ensure_bindable()?;

        let mut requested = HashSet::new();
        let mut candidates = Vec::new();
        for raw in parcel_ids {
            if raw.trim().is_empty() {
                debug!(task_id = %id, "skipping blank parcel id");
                continue;
            }
            let parcel_id = ParcelId::new(raw.as_str()).map_err(ParcelRegistryError::from)?;
            if requested.insert(parcel_id.clone()) {
                candidates.push(parcel_id);
            }
        }

        for parcel_id in &candidates {
            let parcel = self
                .parcels
                .find(parcel_id)
                .await?
                .ok_or_else(|| TransportCoordinatorError::ParcelNotFound(parcel_id.clone()))?;
            if parcel.status() != ParcelStatus::Sorted {
                return Err(TransportCoordinatorError::InvalidBinding {
                    parcel_id: parcel_id.clone(),
                    status: parcel.status(),
                });
            }
        }

        let already_bound: HashSet<ParcelId> =
            self.tasks.bound_parcel_ids(id).await?.into_iter().collect();
        let mut accepted = Vec::new();
        for parcel_id in candidates {
            if already_bound.contains(&parcel_id) {
                debug!(task_id = %id, parcel_id = %parcel_id, "parcel already bound, skipping");
            } else {
                accepted.push(parcel_id);
            }
        }

        let bound_at = self.clock().utc();
        for chunk in accepted.chunks(self.batch_size.get()) {
            let bindings: Vec<TransportBinding> = chunk
                .iter()
                .map(|parcel_id| TransportBinding::new(id.clone(), parcel_id.clone(), bound_at))
                .collect();
            self.tasks.insert_bindings(&bindings).await?;
        }

        let bound_count = self.tasks.count_bindings(id).await?;
        task.record_bound_count(bound_count, self.clock());
        self.tasks.update(&task).await?;
        info!(
            task_id = %id,
            added = accepted.len(),
            bound_count,
            "parcels bound to transport task"
        );
        Ok(task)
    }

    /// Forces a task into `abnormal` and flags its parcels
    /// `transport_abnormal`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportCoordinatorError::TaskNotFound`] when the task does
    /// not exist. Parcel update failures are reported, not returned.
    pub async fn report_abnormal(
        &self,
        id: &TransportTaskId,
        report: AbnormalReport,
    ) -> TransportCoordinatorResult<Propagated<TransportTask>> {
        let mut task = self.get_task(id).await?;
        let update = ParcelStatusUpdate::new(ParcelStatus::TransportAbnormal)
            .with_abnormal(report.reason(), report.handler());
        task.report_abnormal(report, self.clock());
        self.tasks.update(&task).await?;
        info!(task_id = %id, "transport abnormality reported");

        let bound = self.tasks.bound_parcel_ids(id).await?;
        let propagation = self.parcels.propagate(&bound, &update).await;
        Ok(Propagated::new(task, propagation))
    }

    /// Records how an abnormality was handled and resumes the task in
    /// `status`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportCoordinatorError::InvalidParam`] for a blank
    /// status, [`TransportCoordinatorError::TaskNotFound`] when the task does
    /// not exist, [`TransportDomainError::NotAbnormal`] unless the task is
    /// abnormal, or [`TransportDomainError::InvalidTransition`] when
    /// `status` is not reachable from `abnormal`.
    pub async fn handle_abnormal(
        &self,
        id: &TransportTaskId,
        handle_result: &str,
        status: &str,
    ) -> TransportCoordinatorResult<Propagated<TransportTask>> {
        if status.trim().is_empty() {
            return Err(TransportCoordinatorError::InvalidParam("status"));
        }
        let mut task = self.get_task(id).await?;
        if task.status() != TransportStatus::Abnormal {
            return Err(TransportDomainError::NotAbnormal(task.status()).into());
        }
        let requested =
            parse_and_validate(task.status(), status).map_err(TransportDomainError::from)?;
        task.handle_abnormal(handle_result, requested, self.clock())?;
        self.tasks.update(&task).await?;
        info!(task_id = %id, to = %requested, "transport abnormality handled");

        let report = self.propagate_status(&task).await?;
        Ok(Propagated::new(task, report))
    }

    /// Returns the parcels carried by a driver's task.
    ///
    /// # Errors
    ///
    /// Returns [`TransportCoordinatorError::TaskNotFound`] when the task does
    /// not exist, [`TransportCoordinatorError::NotOwned`] when `driver_id`
    /// is not its driver, or [`TransportCoordinatorError::ParcelNotFound`]
    /// when a bound parcel has been archived since binding.
    pub async fn get_task_packages(
        &self,
        driver_id: &str,
        id: &TransportTaskId,
    ) -> TransportCoordinatorResult<Vec<Parcel>> {
        let task = self.get_task(id).await?;
        if !task.is_driven_by(driver_id) {
            return Err(TransportCoordinatorError::NotOwned {
                task_id: id.clone(),
                driver_id: driver_id.trim().to_owned(),
            });
        }
        let mut parcels = Vec::new();
        for parcel_id in self.tasks.bound_parcel_ids(id).await? {
            let parcel = self
                .parcels
                .find(&parcel_id)
                .await?
                .ok_or(TransportCoordinatorError::ParcelNotFound(parcel_id))?;
            parcels.push(parcel);
        }
        Ok(parcels)
    }

    /// Lists a driver's tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TransportCoordinatorError::InvalidParam`] for a blank
    /// driver.
    pub async fn list_driver_tasks(
        &self,
        driver_id: &str,
        status: Option<TransportStatus>,
    ) -> TransportCoordinatorResult<Vec<TransportTask>> {
        if driver_id.trim().is_empty() {
            return Err(TransportCoordinatorError::InvalidParam("driver id"));
        }
        Ok(self.tasks.find_by_driver(driver_id.trim(), status).await?)
    }

    async fn propagate_status(
        &self,
        task: &TransportTask,
    ) -> TransportCoordinatorResult<PropagationReport> {
        let Some(parcel_status) = task.status().propagated_parcel_status() else {
            return Ok(PropagationReport::empty());
        };
        let bound = self.tasks.bound_parcel_ids(task.id()).await?;
        Ok(self
            .parcels
            .propagate(&bound, &ParcelStatusUpdate::new(parcel_status))
            .await)
    }
}
