//! Delivery coordinator: courier rounds, signatures and status propagation
//! onto bound parcels.

use crate::common::{
    AbnormalReport, ErrorKind, IdPrefix, IdProvider, Propagated, PropagationReport,
    TimestampIdProvider, parse_and_validate,
};
use crate::delivery::{
    domain::{
        DeliveryAssignment, DeliveryBinding, DeliveryDomainError, DeliveryStatus, DeliveryTask,
        DeliveryTaskId, ParseSignTypeError, SignInfo, SignType, ensure_all_signed,
    },
    ports::{DeliveryRepositoryError, DeliveryTaskRepository},
};
use crate::parcel::{
    domain::{Parcel, ParcelId, ParcelStatus, ParcelStatusUpdate},
    ports::ParcelRepository,
    services::{ParcelRegistry, ParcelRegistryError},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for assigning a delivery round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDeliveryTaskRequest {
    delivery_area: String,
    courier_id: String,
    courier_name: String,
    start_node: String,
}

impl CreateDeliveryTaskRequest {
    /// Creates a request assigning a courier to an area.
    #[must_use]
    pub fn new(
        delivery_area: impl Into<String>,
        courier_id: impl Into<String>,
        courier_name: impl Into<String>,
        start_node: impl Into<String>,
    ) -> Self {
        Self {
            delivery_area: delivery_area.into(),
            courier_id: courier_id.into(),
            courier_name: courier_name.into(),
            start_node: start_node.into(),
        }
    }
}

/// Request payload for signing a parcel over to its receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignPackageRequest {
    courier_id: String,
    parcel_id: String,
    signer_name: String,
    signer_phone: String,
    sign_type: String,
    remark: String,
}

impl SignPackageRequest {
    /// Creates a signing request made by `courier_id`.
    #[must_use]
    pub fn new(
        courier_id: impl Into<String>,
        parcel_id: impl Into<String>,
        signer_name: impl Into<String>,
        signer_phone: impl Into<String>,
        sign_type: impl Into<String>,
    ) -> Self {
        Self {
            courier_id: courier_id.into(),
            parcel_id: parcel_id.into(),
            signer_name: signer_name.into(),
            signer_phone: signer_phone.into(),
            sign_type: sign_type.into(),
            remark: String::new(),
        }
    }

    /// Adds a free-text remark.
    #[must_use]
    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }
}

/// Service-level errors for delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryCoordinatorError {
    /// A required input was blank.
    #[error("{0} must not be empty")]
    InvalidParam(&'static str),
    /// The sign type names no known way of signing.
    #[error(transparent)]
    InvalidSignType(#[from] ParseSignTypeError),
    /// The delivery task does not exist.
    #[error("delivery task not found: {0}")]
    TaskNotFound(DeliveryTaskId),
    /// A candidate parcel does not exist.
    #[error("parcel not found: {0}")]
    ParcelNotFound(ParcelId),
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DeliveryDomainError),
    /// A candidate parcel has not arrived at the delivery outlet.
    #[error("parcel {parcel_id} is {status}, only arrived parcels can be bound")]
    InvalidBinding {
        /// The rejected parcel.
        parcel_id: ParcelId,
        /// Its current status.
        status: ParcelStatus,
    },
    /// The requester is not this task's courier.
    #[error("delivery task {task_id} is not assigned to courier {courier_id}")]
    NotOwned {
        /// The requested task.
        task_id: DeliveryTaskId,
        /// The requesting courier.
        courier_id: String,
    },
    /// The parcel is not part of this round.
    #[error("parcel {parcel_id} is not bound to delivery task {task_id}")]
    NotBound {
        /// The requested task.
        task_id: DeliveryTaskId,
        /// The parcel that is not bound.
        parcel_id: ParcelId,
    },
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] DeliveryRepositoryError),
    /// Parcel registry operation failed.
    #[error(transparent)]
    Parcel(#[from] ParcelRegistryError),
}

impl DeliveryCoordinatorError {
    /// Classifies the error for the calling layer.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParam(_)
            | Self::InvalidSignType(_)
            | Self::Domain(
                DeliveryDomainError::EmptyTaskId
                | DeliveryDomainError::TaskIdTooLong(_)
                | DeliveryDomainError::MissingField(_),
            ) => ErrorKind::InvalidParam,
            Self::TaskNotFound(_)
            | Self::ParcelNotFound(_)
            | Self::Repository(DeliveryRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Domain(DeliveryDomainError::InvalidTransition(_)) => ErrorKind::InvalidTransition,
            Self::Domain(DeliveryDomainError::NotBindable(_)) => ErrorKind::NotBindable,
            Self::Domain(DeliveryDomainError::NotAbnormal(_)) => ErrorKind::NotAbnormal,
            Self::Domain(DeliveryDomainError::UnsignedPackage(_)) => ErrorKind::UnsignedPackage,
            Self::InvalidBinding { .. } => ErrorKind::InvalidBinding,
            Self::NotOwned { .. } => ErrorKind::NotOwned,
            Self::NotBound { .. }
            | Self::Repository(DeliveryRepositoryError::BindingNotFound { .. }) => {
                ErrorKind::NotBound
            }
            Self::Repository(_) => ErrorKind::Storage,
            Self::Parcel(err) => err.kind(),
        }
    }
}

/// Result type for delivery coordinator operations.
pub type DeliveryCoordinatorResult<T> = Result<T, DeliveryCoordinatorError>;

/// Delivery coordinator service.
pub struct DeliveryCoordinator<D, P, C>
where
    D: DeliveryTaskRepository,
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    tasks: Arc<D>,
    parcels: ParcelRegistry<P, C>,
    ids: Arc<dyn IdProvider>,
}

impl<D, P, C> Clone for DeliveryCoordinator<D, P, C>
where
    D: DeliveryTaskRepository,
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            parcels: self.parcels.clone(),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<D, P, C> DeliveryCoordinator<D, P, C>
where
    D: DeliveryTaskRepository,
    P: ParcelRepository,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator updating parcels through `parcels`.
    #[must_use]
    pub fn new(tasks: Arc<D>, parcels: ParcelRegistry<P, C>) -> Self {
        Self {
            tasks,
            parcels,
            ids: Arc::new(TimestampIdProvider::new()),
        }
    }

    /// Replaces the identifier source.
    #[must_use]
    pub fn with_id_provider(mut self, ids: Arc<dyn IdProvider>) -> Self {
        self.ids = ids;
        self
    }

    fn clock(&self) -> &C {
        self.parcels.clock()
    }

    /// Assigns a new delivery round in `pending` status.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryCoordinatorError::Domain`] when the area, courier
    /// or start node is blank.
    pub async fn create_task(
        &self,
        request: CreateDeliveryTaskRequest,
    ) -> DeliveryCoordinatorResult<DeliveryTask> {
        let assignment = DeliveryAssignment::new(
            &request.delivery_area,
            &request.courier_id,
            &request.courier_name,
            &request.start_node,
        )?;
        let id = DeliveryTaskId::new(self.ids.next_id(IdPrefix::DeliveryTask, self.clock().utc()))?;
        let task = DeliveryTask::new(id, assignment, self.clock());
        self.tasks.store(&task).await?;
        info!(task_id = %task.id(), courier_id = task.courier_id(), "delivery task created");
        Ok(task)
    }

    /// Loads a delivery task.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryCoordinatorError::TaskNotFound`] when the task does
    /// not exist.
    pub async fn get_task(&self, id: &DeliveryTaskId) -> DeliveryCoordinatorResult<DeliveryTask> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| DeliveryCoordinatorError::TaskNotFound(id.clone()))
    }

    /// Returns a task's bindings in delivery order.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryCoordinatorError::Repository`] when the lookup
    /// fails.
    pub async fn bindings(
        &self,
        id: &DeliveryTaskId,
    ) -> DeliveryCoordinatorResult<Vec<DeliveryBinding>> {
        Ok(self.tasks.bindings_for(id).await?)
    }

    /// Replaces the parcels of a pending round.
    ///
    /// Parcels are delivered in input order. Blank candidates are skipped
    /// and a repeated parcel keeps its first position. An empty set clears
    /// the round.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryCoordinatorError::TaskNotFound`] when the task does
    /// not exist, [`DeliveryDomainError::NotBindable`] unless it is pending,
    /// or [`DeliveryCoordinatorError::ParcelNotFound`] or
    /// [`DeliveryCoordinatorError::InvalidBinding`] for a candidate that is
    /// missing or has not arrived.
    pub async fn bind_packages(
        &self,
        id: &DeliveryTaskId,
        parcel_ids: &[String],
    ) -> DeliveryCoordinatorResult<DeliveryTask> {
        let mut task = self.get_task(id).await?;
        task.ensure_bindable()?;

        let mut seen = HashSet::new();
        let mut accepted = Vec::new();
        for raw in parcel_ids {
            if raw.trim().is_empty() {
                debug!(task_id = %id, "skipping blank parcel id");
                continue;
            }
            let parcel_id = ParcelId::new(raw.as_str()).map_err(ParcelRegistryError::from)?;
            if seen.insert(parcel_id.clone()) {
                accepted.push(parcel_id);
            } else {
                debug!(task_id = %id, parcel_id = %parcel_id, "repeated parcel id, keeping first");
            }
        }

        for parcel_id in &accepted {
            let parcel = self
                .parcels
                .find(parcel_id)
                .await?
                .ok_or_else(|| DeliveryCoordinatorError::ParcelNotFound(parcel_id.clone()))?;
            if parcel.status() != ParcelStatus::Arrived {
                return Err(DeliveryCoordinatorError::InvalidBinding {
                    parcel_id: parcel_id.clone(),
                    status: parcel.status(),
                });
            }
        }

        let bound_at = self.clock().utc();
        let bindings: Vec<DeliveryBinding> = (1_u32..)
            .zip(accepted)
            .map(|(order, parcel_id)| DeliveryBinding::new(id.clone(), parcel_id, order, bound_at))
            .collect();
        self.tasks.replace_bindings(id, &bindings).await?;

        let bound_count = self.tasks.count_bindings(id).await?;
        task.record_bound_count(bound_count, self.clock());
        self.tasks.update(&task).await?;
        info!(task_id = %id, bound_count, "delivery round bound");
        Ok(task)
    }

    /// Moves a task to `status` and mirrors it onto the bound parcels.
    ///
    /// Completion is refused while any bound parcel is unsigned.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryCoordinatorError::InvalidParam`] for a blank
    /// status, [`DeliveryCoordinatorError::TaskNotFound`] when the task does
    /// not exist, [`DeliveryDomainError::InvalidTransition`] when the
    /// transition table forbids the change, or
    /// [`DeliveryDomainError::UnsignedPackage`] when completion is blocked.
    /// Parcel update failures are reported, not returned.
    pub async fn change_status(
        &self,
        id: &DeliveryTaskId,
        status: &str,
    ) -> DeliveryCoordinatorResult<Propagated<DeliveryTask>> {
        if status.trim().is_empty() {
            return Err(DeliveryCoordinatorError::InvalidParam("status"));
        }
        let mut task = self.get_task(id).await?;
        let requested =
            parse_and_validate(task.status(), status).map_err(DeliveryDomainError::from)?;
        let bindings = self.tasks.bindings_for(id).await?;
        if requested == DeliveryStatus::Completed {
            ensure_all_signed(&bindings)?;
        }
        let previous = task.status();
        task.change_status(requested, self.clock())?;
        self.tasks.update(&task).await?;
        info!(task_id = %id, from = %previous, to = %requested, "delivery status changed");

        let report = self.propagate_status(&task, &bindings).await;
        Ok(Propagated::new(task, report))
    }

    /// Records a signature on a bound parcel and marks it delivered.
    ///
    /// The signer phone is masked before it is stored.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryCoordinatorError::TaskNotFound`] when the task does
    /// not exist, [`DeliveryCoordinatorError::NotOwned`] when the requester
    /// is not its courier, [`DeliveryCoordinatorError::InvalidSignType`] for
    /// an unknown sign type, [`DeliveryCoordinatorError::NotBound`] when the
    /// parcel is not part of the round, or
    /// [`DeliveryCoordinatorError::Parcel`] when the parcel status cannot be
    /// updated.
    pub async fn sign_package(
        &self,
        id: &DeliveryTaskId,
        request: SignPackageRequest,
    ) -> DeliveryCoordinatorResult<DeliveryBinding> {
        let task = self.get_task(id).await?;
        if !task.is_assigned_to(&request.courier_id) {
            return Err(DeliveryCoordinatorError::NotOwned {
                task_id: id.clone(),
                courier_id: request.courier_id.trim().to_owned(),
            });
        }
        let parcel_id = ParcelId::new(request.parcel_id).map_err(ParcelRegistryError::from)?;
        let sign_type = SignType::try_from(request.sign_type.as_str())?;
        let mut binding = self
            .tasks
            .find_binding(id, &parcel_id)
            .await?
            .ok_or_else(|| DeliveryCoordinatorError::NotBound {
                task_id: id.clone(),
                parcel_id: parcel_id.clone(),
            })?;

        binding.sign(SignInfo::signed(
            &request.signer_name,
            &request.signer_phone,
            sign_type,
            &request.remark,
            self.clock(),
        ));
        self.tasks.update_binding(&binding).await?;
        self.parcels
            .update_status(&parcel_id, &ParcelStatusUpdate::new(ParcelStatus::Delivered))
            .await?;
        info!(task_id = %id, parcel_id = %parcel_id, sign_type = %sign_type, "parcel signed for");
        Ok(binding)
    }

    /// Forces a task into `abnormal` and flags its parcels
    /// `delivery_abnormal`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryCoordinatorError::TaskNotFound`] when the task does
    /// not exist. Parcel update failures are reported, not returned.
    pub async fn report_abnormal(
        &self,
        id: &DeliveryTaskId,
        report: AbnormalReport,
    ) -> DeliveryCoordinatorResult<Propagated<DeliveryTask>> {
        let mut task = self.get_task(id).await?;
        let update = ParcelStatusUpdate::new(ParcelStatus::DeliveryAbnormal)
            .with_abnormal(report.reason(), report.handler());
        task.report_abnormal(report, self.clock());
        self.tasks.update(&task).await?;
        info!(task_id = %id, "delivery abnormality reported");

        let bound = bound_parcel_ids(&self.tasks.bindings_for(id).await?);
        let propagation = self.parcels.propagate(&bound, &update).await;
        Ok(Propagated::new(task, propagation))
    }

    /// Records how an abnormality was handled and resumes the task in
    /// `status`.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryCoordinatorError::InvalidParam`] for a blank
    /// status, [`DeliveryCoordinatorError::TaskNotFound`] when the task does
    /// not exist, [`DeliveryDomainError::NotAbnormal`] unless the task is
    /// abnormal, [`DeliveryDomainError::InvalidTransition`] when `status` is
    /// not reachable from `abnormal`, or
    /// [`DeliveryDomainError::UnsignedPackage`] when completion is blocked.
    pub async fn handle_abnormal(
        &self,
        id: &DeliveryTaskId,
        handle_result: &str,
        status: &str,
    ) -> DeliveryCoordinatorResult<Propagated<DeliveryTask>> {
        if status.trim().is_empty() {
            return Err(DeliveryCoordinatorError::InvalidParam("status"));
        }
        let mut task = self.get_task(id).await?;
        task.ensure_abnormal()?;
        let requested =
            parse_and_validate(task.status(), status).map_err(DeliveryDomainError::from)?;
        let bindings = self.tasks.bindings_for(id).await?;
        if requested == DeliveryStatus::Completed {
            ensure_all_signed(&bindings)?;
        }
        task.handle_abnormal(handle_result, requested, self.clock())?;
        self.tasks.update(&task).await?;
        info!(task_id = %id, to = %requested, "delivery abnormality handled");

        let report = self.propagate_status(&task, &bindings).await;
        Ok(Propagated::new(task, report))
    }

    /// Returns the parcels of a courier's round in delivery order.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryCoordinatorError::TaskNotFound`] when the task does
    /// not exist, [`DeliveryCoordinatorError::NotOwned`] when `courier_id`
    /// is not its courier, or [`DeliveryCoordinatorError::ParcelNotFound`]
    /// when a bound parcel has been archived since binding.
    pub async fn get_task_packages(
        &self,
        courier_id: &str,
        id: &DeliveryTaskId,
    ) -> DeliveryCoordinatorResult<Vec<Parcel>> {
        let task = self.get_task(id).await?;
        if !task.is_assigned_to(courier_id) {
            return Err(DeliveryCoordinatorError::NotOwned {
                task_id: id.clone(),
                courier_id: courier_id.trim().to_owned(),
            });
        }
        let mut parcels = Vec::new();
        for binding in self.tasks.bindings_for(id).await? {
            let parcel = self
                .parcels
                .find(binding.parcel_id())
                .await?
                .ok_or_else(|| {
                    DeliveryCoordinatorError::ParcelNotFound(binding.parcel_id().clone())
                })?;
            parcels.push(parcel);
        }
        Ok(parcels)
    }

    /// Lists a courier's tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryCoordinatorError::InvalidParam`] for a blank
    /// courier.
    pub async fn list_courier_tasks(
        &self,
        courier_id: &str,
        status: Option<DeliveryStatus>,
    ) -> DeliveryCoordinatorResult<Vec<DeliveryTask>> {
        if courier_id.trim().is_empty() {
            return Err(DeliveryCoordinatorError::InvalidParam("courier id"));
        }
        Ok(self.tasks.find_by_courier(courier_id.trim(), status).await?)
    }

    async fn propagate_status(
        &self,
        task: &DeliveryTask,
        bindings: &[DeliveryBinding],
    ) -> PropagationReport {
        match task.status().propagated_parcel_status() {
            Some(parcel_status) => {
                self.parcels
                    .propagate(
                        &bound_parcel_ids(bindings),
                        &ParcelStatusUpdate::new(parcel_status),
                    )
                    .await
            }
            None => PropagationReport::empty(),
        }
    }
}

fn bound_parcel_ids(bindings: &[DeliveryBinding]) -> Vec<ParcelId> {
    bindings
        .iter()
        .map(|binding| binding.parcel_id().clone())
        .collect()
}
