//! Transport task lifecycle status and its transition table.

use super::ParseTransportStatusError;
use crate::common::TaskStatus;
use crate::parcel::domain::ParcelStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportStatus {
    /// Created, vehicle not yet departed.
    Pending,
    /// Vehicle on the road.
    Transporting,
    /// Vehicle reached the end node.
    Arrived,
    /// Leg closed.
    Completed,
    /// An abnormality was reported.
    Abnormal,
}

impl TransportStatus {
    /// Every transport status.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Transporting,
        Self::Arrived,
        Self::Completed,
        Self::Abnormal,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Transporting => "transporting",
            Self::Arrived => "arrived",
            Self::Completed => "completed",
            Self::Abnormal => "abnormal",
        }
    }

    /// Returns whether parcels may be bound in this status.
    #[must_use]
    pub const fn accepts_bindings(self) -> bool {
        matches!(self, Self::Pending | Self::Transporting)
    }

    /// Returns the parcel status pushed to bound parcels on entering this
    /// status, if any.
    #[must_use]
    pub const fn propagated_parcel_status(self) -> Option<ParcelStatus> {
        match self {
            Self::Transporting => Some(ParcelStatus::Transporting),
            Self::Arrived => Some(ParcelStatus::Arrived),
            Self::Pending | Self::Completed | Self::Abnormal => None,
        }
    }
}

impl TaskStatus for TransportStatus {
    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Transporting, Self::Abnormal],
            Self::Transporting => &[Self::Arrived, Self::Abnormal],
            Self::Arrived => &[Self::Completed, Self::Abnormal],
            Self::Abnormal => &[Self::Transporting, Self::Completed],
            Self::Completed => &[],
        }
    }
}

impl TryFrom<&str> for TransportStatus {
    type Error = ParseTransportStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "transporting" => Ok(Self::Transporting),
            "arrived" => Ok(Self::Arrived),
            "completed" => Ok(Self::Completed),
            "abnormal" => Ok(Self::Abnormal),
            _ => Err(ParseTransportStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TransportStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
