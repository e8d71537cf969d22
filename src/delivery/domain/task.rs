//! Delivery task aggregate root and its ordered parcel bindings.

use super::{DeliveryDomainError, DeliveryStatus, DeliveryTaskId, SignInfo};
use crate::common::{AbnormalInfo, AbnormalReport, non_blank, validate_transition};
use crate::parcel::domain::ParcelId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated parameters of a new delivery round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAssignment {
    delivery_area: String,
    courier_id: String,
    courier_name: String,
    start_node: String,
}

impl DeliveryAssignment {
    /// Assigns a courier to an area, starting from a delivery outlet.
    ///
    /// The courier name is optional.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryDomainError::MissingField`] when the area, courier
    /// or start node is blank.
    pub fn new(
        delivery_area: &str,
        courier_id: &str,
        courier_name: &str,
        start_node: &str,
    ) -> Result<Self, DeliveryDomainError> {
        Ok(Self {
            delivery_area: non_blank(delivery_area)
                .ok_or(DeliveryDomainError::MissingField("delivery area"))?,
            courier_id: non_blank(courier_id)
                .ok_or(DeliveryDomainError::MissingField("courier id"))?,
            courier_name: courier_name.trim().to_owned(),
            start_node: non_blank(start_node)
                .ok_or(DeliveryDomainError::MissingField("start node"))?,
        })
    }
}

/// Delivery task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTask {
    id: DeliveryTaskId,
    delivery_area: String,
    courier_id: String,
    courier_name: String,
    start_node: String,
    status: DeliveryStatus,
    bound_count: u32,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    abnormal: Option<AbnormalInfo>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted delivery task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDeliveryTaskData {
    /// Persisted task identifier.
    pub id: DeliveryTaskId,
    /// Persisted delivery area.
    pub delivery_area: String,
    /// Persisted courier identifier.
    pub courier_id: String,
    /// Persisted courier name.
    pub courier_name: String,
    /// Persisted start node.
    pub start_node: String,
    /// Persisted lifecycle status.
    pub status: DeliveryStatus,
    /// Persisted bound parcel count.
    pub bound_count: u32,
    /// Persisted start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted abnormality, if one was reported.
    pub abnormal: Option<AbnormalInfo>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl DeliveryTask {
    /// Creates a pending task for an assignment.
    #[must_use]
    pub fn new(id: DeliveryTaskId, assignment: DeliveryAssignment, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            delivery_area: assignment.delivery_area,
            courier_id: assignment.courier_id,
            courier_name: assignment.courier_name,
            start_node: assignment.start_node,
            status: DeliveryStatus::Pending,
            bound_count: 0,
            started_at: None,
            completed_at: None,
            abnormal: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDeliveryTaskData) -> Self {
        Self {
            id: data.id,
            delivery_area: data.delivery_area,
            courier_id: data.courier_id,
            courier_name: data.courier_name,
            start_node: data.start_node,
            status: data.status,
            bound_count: data.bound_count,
            started_at: data.started_at,
            completed_at: data.completed_at,
            abnormal: data.abnormal,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &DeliveryTaskId {
        &self.id
    }

    /// Returns the delivery area.
    #[must_use]
    pub fn delivery_area(&self) -> &str {
        &self.delivery_area
    }

    /// Returns the courier identifier.
    #[must_use]
    pub fn courier_id(&self) -> &str {
        &self.courier_id
    }

    /// Returns the courier name.
    #[must_use]
    pub fn courier_name(&self) -> &str {
        &self.courier_name
    }

    /// Returns the delivery outlet the round starts from.
    #[must_use]
    pub fn start_node(&self) -> &str {
        &self.start_node
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> DeliveryStatus {
        self.status
    }

    /// Returns the number of bound parcels.
    #[must_use]
    pub const fn bound_count(&self) -> u32 {
        self.bound_count
    }

    /// Returns when the courier first set out.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the round was completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the reported abnormality, if any.
    #[must_use]
    pub const fn abnormal(&self) -> Option<&AbnormalInfo> {
        self.abnormal.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether `courier_id` is the assigned courier.
    #[must_use]
    pub fn is_assigned_to(&self, courier_id: &str) -> bool {
        self.courier_id == courier_id.trim()
    }

    /// Moves the task to `requested` if the transition table allows it.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryDomainError::InvalidTransition`] when the table
    /// forbids the change; the task is left untouched.
    pub fn change_status(
        &mut self,
        requested: DeliveryStatus,
        clock: &impl Clock,
    ) -> Result<(), DeliveryDomainError> {
        validate_transition(self.status, requested)?;
        let timestamp = clock.utc();
        match requested {
            DeliveryStatus::Delivering => {
                self.started_at.get_or_insert(timestamp);
            }
            DeliveryStatus::Completed => self.completed_at = Some(timestamp),
            DeliveryStatus::Pending | DeliveryStatus::Abnormal => {}
        }
        self.status = requested;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Checks that parcels may be bound in the current status.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryDomainError::NotBindable`] unless the task is
    /// pending.
    pub fn ensure_bindable(&self) -> Result<(), DeliveryDomainError> {
        if self.status == DeliveryStatus::Pending {
            Ok(())
        } else {
            Err(DeliveryDomainError::NotBindable(self.status))
        }
    }

    /// Records the size of the replaced binding set.
    pub fn record_bound_count(&mut self, bound_count: u32, clock: &impl Clock) {
        self.bound_count = bound_count;
        self.updated_at = clock.utc();
    }

    /// Forces the task into `abnormal`, bypassing the transition table.
    pub fn report_abnormal(&mut self, report: AbnormalReport, clock: &impl Clock) {
        let info = AbnormalInfo::reported(report, clock);
        self.updated_at = info.reported_at();
        self.abnormal = Some(info);
        self.status = DeliveryStatus::Abnormal;
    }

    /// Checks that abnormality handling applies to the current status.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryDomainError::NotAbnormal`] unless the task is
    /// abnormal.
    pub fn ensure_abnormal(&self) -> Result<(), DeliveryDomainError> {
        if self.status == DeliveryStatus::Abnormal {
            Ok(())
        } else {
            Err(DeliveryDomainError::NotAbnormal(self.status))
        }
    }

    /// Records how an abnormality was handled and resumes the task.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryDomainError::NotAbnormal`] when the task is not
    /// abnormal, or [`DeliveryDomainError::InvalidTransition`] when
    /// `resume_to` is not reachable from `abnormal`. The task is left
    /// untouched on error.
    pub fn handle_abnormal(
        &mut self,
        handle_result: &str,
        resume_to: DeliveryStatus,
        clock: &impl Clock,
    ) -> Result<(), DeliveryDomainError> {
        self.ensure_abnormal()?;
        validate_transition(self.status, resume_to)?;
        self.abnormal = self
            .abnormal
            .as_ref()
            .map(|info| info.with_handle_result(handle_result.trim()));
        self.change_status(resume_to, clock)
    }
}

/// A parcel bound to a delivery task at a position in the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryBinding {
    task_id: DeliveryTaskId,
    parcel_id: ParcelId,
    delivery_order: u32,
    sign_info: Option<SignInfo>,
    bound_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted delivery binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDeliveryBindingData {
    /// Persisted task identifier.
    pub task_id: DeliveryTaskId,
    /// Persisted tracking number.
    pub parcel_id: ParcelId,
    /// Persisted 1-based position in the round.
    pub delivery_order: u32,
    /// Persisted signature, if signed.
    pub sign_info: Option<SignInfo>,
    /// Persisted binding timestamp.
    pub bound_at: DateTime<Utc>,
}

impl DeliveryBinding {
    /// Creates an unsigned binding at a 1-based position.
    #[must_use]
    pub const fn new(
        task_id: DeliveryTaskId,
        parcel_id: ParcelId,
        delivery_order: u32,
        bound_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            parcel_id,
            delivery_order,
            sign_info: None,
            bound_at,
        }
    }

    /// Reconstructs a binding from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDeliveryBindingData) -> Self {
        Self {
            task_id: data.task_id,
            parcel_id: data.parcel_id,
            delivery_order: data.delivery_order,
            sign_info: data.sign_info,
            bound_at: data.bound_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> &DeliveryTaskId {
        &self.task_id
    }

    /// Returns the bound parcel.
    #[must_use]
    pub const fn parcel_id(&self) -> &ParcelId {
        &self.parcel_id
    }

    /// Returns the 1-based position in the round.
    #[must_use]
    pub const fn delivery_order(&self) -> u32 {
        self.delivery_order
    }

    /// Returns the signature, if the parcel was signed for.
    #[must_use]
    pub const fn sign_info(&self) -> Option<&SignInfo> {
        self.sign_info.as_ref()
    }

    /// Returns whether the parcel was signed for.
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.sign_info.is_some()
    }

    /// Returns when the parcel was bound.
    #[must_use]
    pub const fn bound_at(&self) -> DateTime<Utc> {
        self.bound_at
    }

    /// Records a signature, replacing any earlier one.
    pub fn sign(&mut self, sign_info: SignInfo) {
        self.sign_info = Some(sign_info);
    }
}

/// Checks that every binding of a round carries a signature.
///
/// # Errors
///
/// Returns [`DeliveryDomainError::UnsignedPackage`] naming the first unsigned
/// parcel in delivery order.
pub fn ensure_all_signed(bindings: &[DeliveryBinding]) -> Result<(), DeliveryDomainError> {
    bindings
        .iter()
        .filter(|binding| !binding.is_signed())
        .min_by_key(|binding| binding.delivery_order())
        .map_or(Ok(()), |unsigned| {
            Err(DeliveryDomainError::UnsignedPackage(
                unsigned.parcel_id().clone(),
            ))
        })
}
