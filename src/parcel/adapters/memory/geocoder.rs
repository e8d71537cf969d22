//! Geocoders that never leave the process.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::parcel::{
    domain::GeoPoint,
    ports::{Geocoder, GeocodingError},
};

/// Geocoder that resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullGeocoder;

#[async_trait]
impl Geocoder for NullGeocoder {
    async fn coordinates_for(&self, address: &str) -> Result<GeoPoint, GeocodingError> {
        Err(GeocodingError::AddressNotFound(address.to_owned()))
    }
}

/// Geocoder backed by a fixed address table.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    points: HashMap<String, GeoPoint>,
}

impl StaticGeocoder {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. Addresses are matched after trimming.
    #[must_use]
    pub fn with_point(mut self, address: &str, point: GeoPoint) -> Self {
        self.points.insert(address.trim().to_owned(), point);
        self
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn coordinates_for(&self, address: &str) -> Result<GeoPoint, GeocodingError> {
        self.points
            .get(address.trim())
            .copied()
            .ok_or_else(|| GeocodingError::AddressNotFound(address.to_owned()))
    }
}
