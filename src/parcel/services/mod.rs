//! Application services for the parcel registry and sorting abnormalities.

mod registry;
mod sorting;

pub use registry::{
    CreateParcelRequest, ParcelDetails, ParcelRegistry, ParcelRegistryError, ParcelRegistryResult,
};
pub use sorting::{SortingAbnormalOutcome, SortingAbnormalRecorder};
