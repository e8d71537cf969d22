//! Delivery task lifecycle status and its transition table.

use super::ParseDeliveryStatusError;
use crate::common::TaskStatus;
use crate::parcel::domain::ParcelStatus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Created, courier not yet out.
    Pending,
    /// Courier out for delivery.
    Delivering,
    /// Every bound parcel signed for.
    Completed,
    /// An abnormality was reported.
    Abnormal,
}

impl DeliveryStatus {
    /// Every delivery status.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Delivering,
        Self::Completed,
        Self::Abnormal,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Delivering => "delivering",
            Self::Completed => "completed",
            Self::Abnormal => "abnormal",
        }
    }

    /// Returns the parcel status pushed to bound parcels on entering this
    /// status, if any.
    #[must_use]
    pub const fn propagated_parcel_status(self) -> Option<ParcelStatus> {
        match self {
            Self::Delivering => Some(ParcelStatus::Delivering),
            Self::Completed => Some(ParcelStatus::Delivered),
            Self::Pending | Self::Abnormal => None,
        }
    }
}

impl TaskStatus for DeliveryStatus {
    fn as_str(self) -> &'static str {
        Self::as_str(self)
    }

    fn successors(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Delivering, Self::Abnormal],
            Self::Delivering => &[Self::Completed, Self::Abnormal],
            Self::Abnormal => &[Self::Delivering, Self::Completed],
            Self::Completed => &[],
        }
    }
}

impl TryFrom<&str> for DeliveryStatus {
    type Error = ParseDeliveryStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "delivering" => Ok(Self::Delivering),
            "completed" => Ok(Self::Completed),
            "abnormal" => Ok(Self::Abnormal),
            _ => Err(ParseDeliveryStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
