//! Parcel aggregate root and its contact and dimension value objects.

use super::{ParcelDomainError, ParcelId, ParcelStatus, ParcelStatusUpdate};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

fn required(value: &str, field: &'static str) -> Result<String, ParcelDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ParcelDomainError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

/// Name, phone and address of a sender or receiver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    name: String,
    phone: String,
    address: String,
}

impl Contact {
    /// Creates a contact; every field is required.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelDomainError::MissingField`] when any field is blank.
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, ParcelDomainError> {
        Ok(Self {
            name: required(&name.into(), "contact name")?,
            phone: required(&phone.into(), "contact phone")?,
            address: required(&address.into(), "contact address")?,
        })
    }

    /// Returns the contact name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the contact phone number.
    #[must_use]
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Returns the street address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Administrative region of the receiver, used for delivery area routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    province: String,
    city: String,
    district: String,
}

impl Region {
    /// Creates a region; every level is required.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelDomainError::MissingField`] when any level is blank.
    pub fn new(
        province: impl Into<String>,
        city: impl Into<String>,
        district: impl Into<String>,
    ) -> Result<Self, ParcelDomainError> {
        Ok(Self {
            province: required(&province.into(), "province")?,
            city: required(&city.into(), "city")?,
            district: required(&district.into(), "district")?,
        })
    }

    /// Returns the province.
    #[must_use]
    pub fn province(&self) -> &str {
        &self.province
    }

    /// Returns the city.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the district.
    #[must_use]
    pub fn district(&self) -> &str {
        &self.district
    }
}

/// Physical size of a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    weight_kg: f64,
    length_cm: Option<f64>,
    width_cm: Option<f64>,
    height_cm: Option<f64>,
}

impl Dimensions {
    /// Creates dimensions with only the weight known.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelDomainError::InvalidWeight`] unless the weight is a
    /// positive finite number.
    pub fn weighing(weight_kg: f64) -> Result<Self, ParcelDomainError> {
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(ParcelDomainError::InvalidWeight);
        }
        Ok(Self {
            weight_kg,
            length_cm: None,
            width_cm: None,
            height_cm: None,
        })
    }

    /// Adds length, width and height.
    ///
    /// # Errors
    ///
    /// Returns [`ParcelDomainError::InvalidDimension`] when a value is
    /// negative or not finite.
    pub fn with_size(
        self,
        length_cm: f64,
        width_cm: f64,
        height_cm: f64,
    ) -> Result<Self, ParcelDomainError> {
        Ok(Self {
            length_cm: Some(checked_side(length_cm, "length")?),
            width_cm: Some(checked_side(width_cm, "width")?),
            height_cm: Some(checked_side(height_cm, "height")?),
            ..self
        })
    }

    /// Returns the weight in kilograms.
    #[must_use]
    pub const fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    /// Returns the length in centimetres, if measured.
    #[must_use]
    pub const fn length_cm(&self) -> Option<f64> {
        self.length_cm
    }

    /// Returns the width in centimetres, if measured.
    #[must_use]
    pub const fn width_cm(&self) -> Option<f64> {
        self.width_cm
    }

    /// Returns the height in centimetres, if measured.
    #[must_use]
    pub const fn height_cm(&self) -> Option<f64> {
        self.height_cm
    }
}

fn checked_side(value: f64, side: &'static str) -> Result<f64, ParcelDomainError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ParcelDomainError::InvalidDimension(side))
    }
}

/// Parcel aggregate root.
///
/// Status is only ever changed through [`Parcel::apply_status_update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    id: ParcelId,
    sender: Contact,
    receiver: Contact,
    receiver_region: Region,
    dimensions: Dimensions,
    status: ParcelStatus,
    abnormal_reason: Option<String>,
    abnormal_handler: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedParcelData {
    /// Persisted tracking number.
    pub id: ParcelId,
    /// Persisted sender.
    pub sender: Contact,
    /// Persisted receiver.
    pub receiver: Contact,
    /// Persisted receiver region.
    pub receiver_region: Region,
    /// Persisted dimensions.
    pub dimensions: Dimensions,
    /// Persisted status.
    pub status: ParcelStatus,
    /// Persisted abnormal reason, if any.
    pub abnormal_reason: Option<String>,
    /// Persisted abnormal handler, if any.
    pub abnormal_handler: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Parcel {
    /// Creates a freshly collected parcel.
    #[must_use]
    pub fn collect(
        id: ParcelId,
        sender: Contact,
        receiver: Contact,
        receiver_region: Region,
        dimensions: Dimensions,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            sender,
            receiver,
            receiver_region,
            dimensions,
            status: ParcelStatus::Collected,
            abnormal_reason: None,
            abnormal_handler: None,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        }
    }

    /// Reconstructs a parcel from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedParcelData) -> Self {
        Self {
            id: data.id,
            sender: data.sender,
            receiver: data.receiver,
            receiver_region: data.receiver_region,
            dimensions: data.dimensions,
            status: data.status,
            abnormal_reason: data.abnormal_reason,
            abnormal_handler: data.abnormal_handler,
            created_at: data.created_at,
            updated_at: data.updated_at,
            deleted_at: data.deleted_at,
        }
    }

    /// Returns the tracking number.
    #[must_use]
    pub const fn id(&self) -> &ParcelId {
        &self.id
    }

    /// Returns the sender.
    #[must_use]
    pub const fn sender(&self) -> &Contact {
        &self.sender
    }

    /// Returns the receiver.
    #[must_use]
    pub const fn receiver(&self) -> &Contact {
        &self.receiver
    }

    /// Returns the receiver region.
    #[must_use]
    pub const fn receiver_region(&self) -> &Region {
        &self.receiver_region
    }

    /// Returns the physical dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ParcelStatus {
        self.status
    }

    /// Returns the recorded abnormal reason, if any.
    #[must_use]
    pub fn abnormal_reason(&self) -> Option<&str> {
        self.abnormal_reason.as_deref()
    }

    /// Returns the recorded abnormal handler, if any.
    #[must_use]
    pub fn abnormal_handler(&self) -> Option<&str> {
        self.abnormal_handler.as_deref()
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

    /// Returns when the parcel was archived, if it was.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns whether the parcel has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Applies a derived status.
    ///
    /// Reason and handler replace stored values only when the update
    /// carries them.
    pub fn apply_status_update(&mut self, update: &ParcelStatusUpdate, at: DateTime<Utc>) {
        self.status = update.status();
        if let Some(reason) = update.reason() {
            self.abnormal_reason = Some(reason.to_owned());
        }
        if let Some(handler) = update.handler() {
            self.abnormal_handler = Some(handler.to_owned());
        }
        self.updated_at = at;
    }

    /// Marks the parcel as soft-deleted. Repeated calls keep the first
    /// marker.
    pub fn mark_deleted(&mut self, clock: &impl Clock) {
        if self.deleted_at.is_none() {
            let timestamp = clock.utc();
            self.deleted_at = Some(timestamp);
            self.updated_at = timestamp;
        }
    }
}
