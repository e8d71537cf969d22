//! In-memory adapters for the parcel registry.

mod geocoder;
mod parcel;

pub use geocoder::{NullGeocoder, StaticGeocoder};
pub use parcel::InMemoryParcelRepository;
