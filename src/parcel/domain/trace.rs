//! Append-only parcel trace log.

use super::{ParcelId, ParseNodeTypeError, TraceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of operational node a trace entry was recorded at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Pickup from the sender.
    Collection,
    /// Sorting centre handling.
    Sorting,
    /// Line-haul transport.
    Transport,
    /// Last-mile delivery.
    Delivery,
    /// Abnormal event.
    Abnormal,
}

impl NodeType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Sorting => "sorting",
            Self::Transport => "transport",
            Self::Delivery => "delivery",
            Self::Abnormal => "abnormal",
        }
    }
}

impl TryFrom<&str> for NodeType {
    type Error = ParseNodeTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "collection" => Ok(Self::Collection),
            "sorting" => Ok(Self::Sorting),
            "transport" => Ok(Self::Transport),
            "delivery" => Ok(Self::Delivery),
            "abnormal" => Ok(Self::Abnormal),
            _ => Err(ParseNodeTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Longitude/latitude pair.
///
/// `(0, 0)` stands for an unknown location and is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Placeholder for a location that could not be resolved.
    pub const UNKNOWN: Self = Self {
        longitude: 0.0,
        latitude: 0.0,
    };

    /// Creates a point.
    #[must_use]
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Returns the longitude.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the latitude.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns whether this is the unknown-location placeholder.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl Default for GeoPoint {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Operational event to be appended to a parcel's trace.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEntry {
    node_type: NodeType,
    node_name: String,
    node_address: Option<String>,
    location: GeoPoint,
    operator: String,
    remark: String,
}

impl TraceEntry {
    /// Describes an event at `node_name`. Location defaults to unknown.
    #[must_use]
    pub fn new(node_type: NodeType, node_name: impl Into<String>) -> Self {
        Self {
            node_type,
            node_name: node_name.into(),
            node_address: None,
            location: GeoPoint::UNKNOWN,
            operator: String::new(),
            remark: String::new(),
        }
    }

    /// Sets the node address and its resolved location.
    #[must_use]
    pub fn at(mut self, node_address: impl Into<String>, location: GeoPoint) -> Self {
        self.node_address = Some(node_address.into());
        self.location = location;
        self
    }

    /// Sets the operator.
    #[must_use]
    pub fn by(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Sets the remark.
    #[must_use]
    pub fn remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }
}

/// Immutable trace log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelTrace {
    id: TraceId,
    parcel_id: ParcelId,
    node_type: NodeType,
    node_name: String,
    node_address: Option<String>,
    location: GeoPoint,
    operator: String,
    operated_at: DateTime<Utc>,
    remark: String,
}

/// Parameter object for reconstructing a persisted trace entry.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTraceData {
    /// Persisted trace identifier.
    pub id: TraceId,
    /// Persisted parcel identifier.
    pub parcel_id: ParcelId,
    /// Persisted node type.
    pub node_type: NodeType,
    /// Persisted node name.
    pub node_name: String,
    /// Persisted node address, if any.
    pub node_address: Option<String>,
    /// Persisted location.
    pub location: GeoPoint,
    /// Persisted operator.
    pub operator: String,
    /// Persisted operation timestamp.
    pub operated_at: DateTime<Utc>,
    /// Persisted remark.
    pub remark: String,
}

impl ParcelTrace {
    /// Records `entry` against `parcel_id`.
    #[must_use]
    pub fn record(
        id: TraceId,
        parcel_id: ParcelId,
        entry: TraceEntry,
        operated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            parcel_id,
            node_type: entry.node_type,
            node_name: entry.node_name,
            node_address: entry.node_address,
            location: entry.location,
            operator: entry.operator,
            operated_at,
            remark: entry.remark,
        }
    }

    /// Reconstructs a trace entry from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTraceData) -> Self {
        Self {
            id: data.id,
            parcel_id: data.parcel_id,
            node_type: data.node_type,
            node_name: data.node_name,
            node_address: data.node_address,
            location: data.location,
            operator: data.operator,
            operated_at: data.operated_at,
            remark: data.remark,
        }
    }

    /// Returns the trace identifier.
    #[must_use]
    pub const fn id(&self) -> &TraceId {
        &self.id
    }

    /// Returns the parcel this entry belongs to.
    #[must_use]
    pub const fn parcel_id(&self) -> &ParcelId {
        &self.parcel_id
    }

    /// Returns the node type.
    #[must_use]
    pub const fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// Returns the node name.
    #[must_use]
    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    /// Returns the node address, if recorded.
    #[must_use]
    pub fn node_address(&self) -> Option<&str> {
        self.node_address.as_deref()
    }

    /// Returns the node location.
    #[must_use]
    pub const fn location(&self) -> GeoPoint {
        self.location
    }

    /// Returns who performed the operation.
    #[must_use]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Returns when the operation happened.
    #[must_use]
    pub const fn operated_at(&self) -> DateTime<Utc> {
        self.operated_at
    }

    /// Returns the remark.
    #[must_use]
    pub fn remark(&self) -> &str {
        &self.remark
    }
}
