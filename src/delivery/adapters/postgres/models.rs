//! Diesel row models for delivery persistence.

use super::schema::{delivery_task_parcels, delivery_tasks};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Delivery task row, used for reads, inserts and full-row updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = delivery_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct DeliveryTaskRow {
    /// Task identifier.
    pub id: String,
    /// Delivery area.
    pub delivery_area: String,
    /// Courier identifier.
    pub courier_id: String,
    /// Courier name.
    pub courier_name: String,
    /// Start node.
    pub start_node: String,
    /// Task status.
    pub status: String,
    /// Number of bound parcels.
    pub bound_count: i32,
    /// Start timestamp.
    pub started_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
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

/// Binding row without the surrogate key, used for reads, inserts and
/// signature updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = delivery_task_parcels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct DeliveryBindingRow {
    /// Task identifier.
    pub task_id: String,
    /// Tracking number.
    pub parcel_id: String,
    /// 1-based position in the round.
    pub delivery_order: i32,
    /// Signer name.
    pub signer_name: Option<String>,
    /// Masked signer phone.
    pub signer_phone: Option<String>,
    /// Signing timestamp.
    pub signed_at: Option<DateTime<Utc>>,
    /// Sign type.
    pub sign_type: Option<String>,
    /// Signing remark.
    pub sign_remark: Option<String>,
    /// Binding timestamp.
    pub bound_at: DateTime<Utc>,
}
