//! Parcel status and the derived status update applied by coordinators.

use super::ParseParcelStatusError;
use crate::common::non_blank;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parcel status.
///
/// Parcel statuses are derived: they follow task transitions and sorting
/// operations and are never validated against a transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Picked up from the sender.
    Collected,
    /// Sorted and ready for a transport leg.
    Sorted,
    /// Flagged abnormal during sorting.
    Abnormal,
    /// On a vehicle between nodes.
    Transporting,
    /// Arrived at the destination node.
    Arrived,
    /// Out for last-mile delivery.
    Delivering,
    /// Signed for by the receiver.
    Delivered,
    /// The carrying transport task reported an abnormality.
    TransportAbnormal,
    /// The carrying delivery task reported an abnormality.
    DeliveryAbnormal,
}

impl ParcelStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collected => "collected",
            Self::Sorted => "sorted",
            Self::Abnormal => "abnormal",
            Self::Transporting => "transporting",
            Self::Arrived => "arrived",
            Self::Delivering => "delivering",
            Self::Delivered => "delivered",
            Self::TransportAbnormal => "transport_abnormal",
            Self::DeliveryAbnormal => "delivery_abnormal",
        }
    }
}

impl TryFrom<&str> for ParcelStatus {
    type Error = ParseParcelStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "collected" => Ok(Self::Collected),
            "sorted" => Ok(Self::Sorted),
            "abnormal" => Ok(Self::Abnormal),
            "transporting" => Ok(Self::Transporting),
            "arrived" => Ok(Self::Arrived),
            "delivering" => Ok(Self::Delivering),
            "delivered" => Ok(Self::Delivered),
            "transport_abnormal" => Ok(Self::TransportAbnormal),
            "delivery_abnormal" => Ok(Self::DeliveryAbnormal),
            _ => Err(ParseParcelStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A derived status change pushed onto a parcel.
///
/// Blank reason or handler values are dropped so they never overwrite what
/// the parcel already records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelStatusUpdate {
    status: ParcelStatus,
    reason: Option<String>,
    handler: Option<String>,
}

impl ParcelStatusUpdate {
    /// Creates an update that only changes the status.
    #[must_use]
    pub const fn new(status: ParcelStatus) -> Self {
        Self {
            status,
            reason: None,
            handler: None,
        }
    }

    /// Attaches an abnormal reason and handler.
    #[must_use]
    pub fn with_abnormal(mut self, reason: &str, handler: &str) -> Self {
        self.reason = non_blank(reason);
        self.handler = non_blank(handler);
        self
    }

    /// Returns the target status.
    #[must_use]
    pub const fn status(&self) -> ParcelStatus {
        self.status
    }

    /// Returns the abnormal reason to record, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the abnormal handler to record, if any.
    #[must_use]
    pub fn handler(&self) -> Option<&str> {
        self.handler.as_deref()
    }
}

impl From<ParcelStatus> for ParcelStatusUpdate {
    fn from(status: ParcelStatus) -> Self {
        Self::new(status)
    }
}
