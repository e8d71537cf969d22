//! Domain model for parcels, their trace log and abnormal records.
//!
//! Parcel status is derived: it is set by sorting operations and by the
//! transport and delivery coordinators, never validated against a table.

mod abnormal;
mod error;
mod ids;
mod parcel;
mod status;
mod trace;

pub use abnormal::{AbnormalRecord, AbnormalRecordStatus, PersistedAbnormalRecordData};
pub use error::{
    ParcelDomainError, ParseAbnormalRecordStatusError, ParseNodeTypeError, ParseParcelStatusError,
};
pub use ids::{AbnormalRecordId, ParcelId, TraceId};
pub use parcel::{Contact, Dimensions, Parcel, PersistedParcelData, Region};
pub use status::{ParcelStatus, ParcelStatusUpdate};
pub use trace::{GeoPoint, NodeType, ParcelTrace, PersistedTraceData, TraceEntry};
