//! Port contracts for the parcel registry.

pub mod geocoder;
pub mod repository;

pub use geocoder::{Geocoder, GeocodingError};
pub use repository::{ParcelRepository, ParcelRepositoryError, ParcelRepositoryResult};
