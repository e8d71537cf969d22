//! Storage contracts every task repository adapter must honour.
//!
//! Each contract takes the adapter under test plus a parcel repository the
//! bindings can reference.

pub mod delivery;
pub mod transport;

use mockable::DefaultClock;
use parcel_flow::parcel::{
    domain::{Contact, Dimensions, Parcel, ParcelId, Region},
    ports::ParcelRepository,
};

/// Stores a collected parcel for bindings to point at.
///
/// # Errors
///
/// Returns an error if the parcel is invalid or cannot be stored.
pub async fn store_parcel<P: ParcelRepository>(
    parcels: &P,
    raw_id: &str,
) -> eyre::Result<ParcelId> {
    let parcel = Parcel::collect(
        ParcelId::new(raw_id)?,
        Contact::new("Li Lei", "13800001111", "1 West Lake Rd, Hangzhou")?,
        Contact::new("Han Meimei", "13987654321", "9 Nanshan Ave, Shenzhen")?,
        Region::new("Guangdong", "Shenzhen", "Nanshan")?,
        Dimensions::weighing(1.0)?,
        &DefaultClock,
    );
    parcels.store(&parcel).await?;
    Ok(parcel.id().clone())
}
