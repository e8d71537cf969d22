//! Diesel row models for transport persistence.

use super::schema::{transport_task_parcels, transport_tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Transport task row, used for reads, inserts and full-row updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = transport_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TransportTaskRow {
    /// Task identifier.
    pub id: String,
    /// Start node.
    pub start_node: String,
    /// End node.
    pub end_node: String,
    /// Vehicle identifier.
    pub vehicle_id: String,
    /// Driver identifier.
    pub driver_id: Option<String>,
    /// Driver name.
    pub driver_name: Option<String>,
    /// Task status.
    pub status: String,
    /// Number of bound parcels.
    pub bound_count: i32,
    /// Estimated arrival time.
    pub estimated_arrival: Option<DateTime<Utc>>,
    /// Departure timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Actual arrival timestamp.
    pub arrived_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// JSON waypoint description.
    pub route_json: Option<String>,
    /// Route distance in kilometres.
    pub distance_km: f64,
    /// Abnormality category.
    pub abnormal_type: Option<String>,
    /// Abnormality reason.
    pub abnormal_reason: Option<String>,
    /// Abnormality handler.
    pub abnormal_handler: Option<String>,
    /// Abnormality report timestamp.
    pub abnormal_reported_at: Option<DateTime<Utc>>,
    /// Abnormality handle result.
    pub abnormal_handle_result: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Binding insert model; the surrogate key is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transport_task_parcels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewTransportBindingRow {
    /// Task identifier.
    pub task_id: String,
    /// Tracking number.
    pub parcel_id: String,
    /// Binding timestamp.
    pub bound_at: DateTime<Utc>,
}
