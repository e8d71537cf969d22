//! Transport task aggregate root and its parcel bindings.

use super::{TransportDomainError, TransportRoute, TransportStatus, TransportTaskId};
use crate::common::{AbnormalInfo, AbnormalReport, non_blank, validate_transition};
use crate::parcel::domain::ParcelId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Validated parameters of a new transport leg.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportPlan {
    start_node: String,
    end_node: String,
    vehicle_id: String,
    driver_id: Option<String>,
    driver_name: Option<String>,
    estimated_arrival: Option<DateTime<Utc>>,
    route: TransportRoute,
}

impl TransportPlan {
    /// Creates a plan for a leg between two nodes on one vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`TransportDomainError::MissingField`] when a node or the
    /// vehicle is blank.
    pub fn new(
        start_node: &str,
        end_node: &str,
        vehicle_id: &str,
    ) -> Result<Self, TransportDomainError> {
        Ok(Self {
            start_node: non_blank(start_node)
                .ok_or(TransportDomainError::MissingField("start node"))?,
            end_node: non_blank(end_node).ok_or(TransportDomainError::MissingField("end node"))?,
            vehicle_id: non_blank(vehicle_id)
                .ok_or(TransportDomainError::MissingField("vehicle id"))?,
            driver_id: None,
            driver_name: None,
            estimated_arrival: None,
            route: TransportRoute::default(),
        })
    }

    /// Assigns a driver. Blank values leave the leg unassigned.
    #[must_use]
    pub fn with_driver(mut self, driver_id: &str, driver_name: &str) -> Self {
        self.driver_id = non_blank(driver_id);
        self.driver_name = non_blank(driver_name);
        self
    }

    /// Sets the estimated arrival time.
    #[must_use]
    pub const fn with_estimated_arrival(mut self, estimated_arrival: DateTime<Utc>) -> Self {
        self.estimated_arrival = Some(estimated_arrival);
        self
    }

    /// Sets the planned route.
    #[must_use]
    pub fn with_route(mut self, route: TransportRoute) -> Self {
        self.route = route;
        self
    }
}

/// Transport task aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportTask {
    id: TransportTaskId,
    start_node: String,
    end_node: String,
    vehicle_id: String,
    driver_id: Option<String>,
    driver_name: Option<String>,
    status: TransportStatus,
    bound_count: u32,
    estimated_arrival: Option<DateTime<Utc>>,
    started_at: Option<DateTime<Utc>>,
    arrived_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    route: TransportRoute,
    abnormal: Option<AbnormalInfo>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted transport task.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTransportTaskData {
    /// Persisted task identifier.
    pub id: TransportTaskId,
    /// Persisted start node.
    pub start_node: String,
    /// Persisted end node.
    pub end_node: String,
    /// Persisted vehicle identifier.
    pub vehicle_id: String,
    /// Persisted driver identifier, if assigned.
    pub driver_id: Option<String>,
    /// Persisted driver name, if assigned.
    pub driver_name: Option<String>,
    /// Persisted lifecycle status.
    pub status: TransportStatus,
    /// Persisted bound parcel count.
    pub bound_count: u32,
    /// Persisted estimated arrival time.
    pub estimated_arrival: Option<DateTime<Utc>>,
    /// Persisted departure timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Persisted actual arrival timestamp.
    pub arrived_at: Option<DateTime<Utc>>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted route.
    pub route: TransportRoute,
    /// Persisted abnormality, if one was reported.
    pub abnormal: Option<AbnormalInfo>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TransportTask {
    /// Creates a pending task from a plan.
    #[must_use]
    pub fn new(id: TransportTaskId, plan: TransportPlan, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            start_node: plan.start_node,
            end_node: plan.end_node,
            vehicle_id: plan.vehicle_id,
            driver_id: plan.driver_id,
            driver_name: plan.driver_name,
            status: TransportStatus::Pending,
            bound_count: 0,
            estimated_arrival: plan.estimated_arrival,
            started_at: None,
            arrived_at: None,
            completed_at: None,
            route: plan.route,
            abnormal: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTransportTaskData) -> Self {
        Self {
            id: data.id,
            start_node: data.start_node,
            end_node: data.end_node,
            vehicle_id: data.vehicle_id,
            driver_id: data.driver_id,
            driver_name: data.driver_name,
            status: data.status,
            bound_count: data.bound_count,
            estimated_arrival: data.estimated_arrival,
            started_at: data.started_at,
            arrived_at: data.arrived_at,
            completed_at: data.completed_at,
            route: data.route,
            abnormal: data.abnormal,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TransportTaskId {
        &self.id
    }

    /// Returns the start node.
    #[must_use]
    pub fn start_node(&self) -> &str {
        &self.start_node
    }

    /// Returns the end node.
    #[must_use]
    pub fn end_node(&self) -> &str {
        &self.end_node
    }

    /// Returns the vehicle identifier.
    #[must_use]
    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    /// Returns the assigned driver identifier, if any.
    #[must_use]
    pub fn driver_id(&self) -> Option<&str> {
        self.driver_id.as_deref()
    }

    /// Returns the assigned driver name, if any.
    #[must_use]
    pub fn driver_name(&self) -> Option<&str> {
        self.driver_name.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TransportStatus {
        self.status
    }

    /// Returns the number of bound parcels.
    #[must_use]
    pub const fn bound_count(&self) -> u32 {
        self.bound_count
    }

    /// Returns the estimated arrival time.
    #[must_use]
    pub const fn estimated_arrival(&self) -> Option<DateTime<Utc>> {
        self.estimated_arrival
    }

    /// Returns when the vehicle first departed.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns when the vehicle last arrived.
    #[must_use]
    pub const fn arrived_at(&self) -> Option<DateTime<Utc>> {
        self.arrived_at
    }

    /// Returns when the task was completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the planned route.
    #[must_use]
    pub const fn route(&self) -> &TransportRoute {
        &self.route
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

    /// Returns whether `driver_id` is the assigned driver.
    #[must_use]
    pub fn is_driven_by(&self, driver_id: &str) -> bool {
        self.driver_id.as_deref() == Some(driver_id.trim())
    }

    /// Moves the task to `requested` if the transition table allows it.
    ///
    /// Departure is stamped once; arrival is stamped on every arrival.
    ///
    /// # Errors
    ///
    /// Returns [`TransportDomainError::InvalidTransition`] when the table
    /// forbids the change; the task is left untouched.
    pub fn change_status(
        &mut self,
        requested: TransportStatus,
        clock: &impl Clock,
    ) -> Result<(), TransportDomainError> {
        validate_transition(self.status, requested)?;
        let timestamp = clock.utc();
        match requested {
            TransportStatus::Transporting => {
                self.started_at.get_or_insert(timestamp);
            }
            TransportStatus::Arrived => self.arrived_at = Some(timestamp),
            TransportStatus::Completed => self.completed_at = Some(timestamp),
            TransportStatus::Pending | TransportStatus::Abnormal => {}
        }
        self.status = requested;
        self.updated_at = timestamp;
        Ok(())
    }

    /// Checks that parcels may be bound in the current status.
    ///
    /// # Errors
    ///
    /// Returns [`TransportDomainError::NotBindable`] unless the task is
    /// pending or transporting.
    pub const fn ensure_bindable(&self) -> Result<(), TransportDomainError> {
        if self.status.accepts_bindings() {
            Ok(())
        } else {
            Err(TransportDomainError::NotBindable(self.status))
        }
    }

    /// Records the authoritative bound count read back from the bindings.
    pub fn record_bound_count(&mut self, bound_count: u32, clock: &impl Clock) {
        self.bound_count = bound_count;
        self.updated_at = clock.utc();
    }

    /// Forces the task into `abnormal`, bypassing the transition table.
    pub fn report_abnormal(&mut self, report: AbnormalReport, clock: &impl Clock) {
        let info = AbnormalInfo::reported(report, clock);
        self.updated_at = info.reported_at();
        self.abnormal = Some(info);
        self.status = TransportStatus::Abnormal;
    }

    /// Records how an abnormality was handled and resumes the task.
    ///
    /// # Errors
    ///
    /// Returns [`TransportDomainError::NotAbnormal`] when the task is not
    /// abnormal, or [`TransportDomainError::InvalidTransition`] when
    /// `resume_to` is not reachable from `abnormal`. The task is left
    /// untouched on error.
    pub fn handle_abnormal(
        &mut self,
        handle_result: &str,
        resume_to: TransportStatus,
        clock: &impl Clock,
    ) -> Result<(), TransportDomainError> {
        if self.status != TransportStatus::Abnormal {
            return Err(TransportDomainError::NotAbnormal(self.status));
        }
        validate_transition(self.status, resume_to)?;
        self.abnormal = self
            .abnormal
            .as_ref()
            .map(|info| info.with_handle_result(handle_result.trim()));
        self.change_status(resume_to, clock)
    }
}

/// A parcel bound to a transport task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportBinding {
    task_id: TransportTaskId,
    parcel_id: ParcelId,
    bound_at: DateTime<Utc>,
}

impl TransportBinding {
    /// Creates a binding stamped with `bound_at`.
    #[must_use]
    pub const fn new(
        task_id: TransportTaskId,
        parcel_id: ParcelId,
        bound_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            parcel_id,
            bound_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> &TransportTaskId {
        &self.task_id
    }

    /// Returns the bound parcel.
    #[must_use]
    pub const fn parcel_id(&self) -> &ParcelId {
        &self.parcel_id
    }

    /// Returns when the parcel was bound.
    #[must_use]
    pub const fn bound_at(&self) -> DateTime<Utc> {
        self.bound_at
    }
}
