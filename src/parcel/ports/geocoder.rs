//! Port for resolving node addresses to coordinates.

use crate::parcel::domain::GeoPoint;
use async_trait::async_trait;
use thiserror::Error;

/// Address-to-coordinates lookup.
///
/// Callers treat any error as an unknown location.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves `address` to a longitude/latitude pair.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodingError`] when the address cannot be resolved.
    async fn coordinates_for(&self, address: &str) -> Result<GeoPoint, GeocodingError>;
}

/// Errors returned by geocoder implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeocodingError {
    /// The address is unknown to the geocoder.
    #[error("address not found: {0}")]
    AddressNotFound(String),

    /// The geocoding service could not be reached or answered badly.
    #[error("geocoding service unavailable: {0}")]
    Unavailable(String),
}
