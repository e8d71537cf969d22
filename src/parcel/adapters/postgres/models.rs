//! Diesel row models for parcel persistence.

use super::schema::{abnormal_records, parcel_traces, parcels};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Parcel row, used for reads, inserts and full-row updates.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = parcels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct ParcelRow {
    /// Tracking number.
    pub id: String,
    /// Sender name.
    pub sender_name: String,
    /// Sender phone.
    pub sender_phone: String,
    /// Sender address.
    pub sender_address: String,
    /// Receiver name.
    pub receiver_name: String,
    /// Receiver phone.
    pub receiver_phone: String,
    /// Receiver address.
    pub receiver_address: String,
    /// Receiver province.
    pub receiver_province: String,
    /// Receiver city.
    pub receiver_city: String,
    /// Receiver district.
    pub receiver_district: String,
    /// Weight in kilograms.
    pub weight_kg: f64,
    /// Length in centimetres.
    pub length_cm: Option<f64>,
    /// Width in centimetres.
    pub width_cm: Option<f64>,
    /// Height in centimetres.
    pub height_cm: Option<f64>,
    /// Parcel status.
    pub status: String,
    /// Abnormal reason.
    pub abnormal_reason: Option<String>,
    /// Abnormal handler.
    pub abnormal_handler: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Trace row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = parcel_traces)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TraceRow {
    /// Trace identifier.
    pub id: String,
    /// Tracking number.
    pub parcel_id: String,
    /// Node type.
    pub node_type: String,
    /// Node name.
    pub node_name: String,
    /// Node address.
    pub node_address: Option<String>,
    /// Node longitude.
    pub longitude: f64,
    /// Node latitude.
    pub latitude: f64,
    /// Operator.
    pub operator: String,
    /// Operation timestamp.
    pub operated_at: DateTime<Utc>,
    /// Remark.
    pub remark: String,
}

/// Abnormal record row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = abnormal_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct AbnormalRecordRow {
    /// Record identifier.
    pub id: String,
    /// Tracking number.
    pub parcel_id: String,
    /// Abnormality category.
    pub abnormal_type: String,
    /// Reason.
    pub reason: String,
    /// Processing method.
    pub processing_method: Option<String>,
    /// Processor.
    pub processor: String,
    /// Processing timestamp.
    pub processed_at: Option<DateTime<Utc>>,
    /// Processing status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
