//! Domain model for last-mile delivery rounds.
//!
//! A delivery task assigns arrived parcels to one courier in a fixed order.
//! Each parcel is signed for individually; the round can only complete once
//! every bound parcel carries a signature.

mod error;
mod ids;
mod sign;
mod status;
mod task;

pub use error::{DeliveryDomainError, ParseDeliveryStatusError, ParseSignTypeError};
pub use ids::DeliveryTaskId;
pub use sign::{PersistedSignInfo, SignInfo, SignType, mask_phone};
pub use status::DeliveryStatus;
pub use task::{
    DeliveryAssignment, DeliveryBinding, DeliveryTask, PersistedDeliveryBindingData,
    PersistedDeliveryTaskData, ensure_all_signed,
};
