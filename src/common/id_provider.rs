//! Business identifier generation.
//!
//! Identifiers are `prefix + yyyyMMddHHmmss + random upper-case
//! alphanumerics`. Randomness comes from UUID v4, which draws on the
//! process-wide OS generator rather than a per-call seed. Uniqueness is
//! practical, not guaranteed; stores still reject duplicates.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Radix used for the random suffix alphabet (`0-9A-Z`).
const SUFFIX_RADIX: u32 = 36;

/// Entity kinds that receive generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdPrefix {
    /// Parcel tracking numbers.
    Parcel,
    /// Parcel trace entries.
    Trace,
    /// Abnormal records.
    AbnormalRecord,
    /// Transport tasks.
    TransportTask,
    /// Delivery tasks.
    DeliveryTask,
}

impl IdPrefix {
    /// Returns the literal prefix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parcel => "KD",
            Self::Trace => "TR",
            Self::AbnormalRecord => "AB",
            Self::TransportTask => "TRAN",
            Self::DeliveryTask => "DELI",
        }
    }

    /// Returns the number of random characters appended after the timestamp.
    #[must_use]
    pub const fn suffix_len(self) -> usize {
        match self {
            Self::Parcel => 6,
            Self::Trace | Self::AbnormalRecord | Self::TransportTask | Self::DeliveryTask => 4,
        }
    }
}

/// Source of unique business identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait IdProvider: Send + Sync {
    /// Returns a fresh identifier for `prefix` stamped with `now`.
    fn next_id(&self, prefix: IdPrefix, now: DateTime<Utc>) -> String;
}

/// Default provider producing timestamped identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampIdProvider;

impl TimestampIdProvider {
    /// Creates a provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl IdProvider for TimestampIdProvider {
    fn next_id(&self, prefix: IdPrefix, now: DateTime<Utc>) -> String {
        let mut id = String::with_capacity(prefix.as_str().len() + 14 + prefix.suffix_len());
        id.push_str(prefix.as_str());
        id.push_str(&now.format("%Y%m%d%H%M%S").to_string());
        id.push_str(&random_suffix(prefix.suffix_len()));
        id
    }
}

/// Maps UUID v4 bytes onto `0-9A-Z`.
///
/// Only the leading six bytes are used; they carry no version or variant
/// bits.
fn random_suffix(len: usize) -> String {
    Uuid::new_v4()
        .as_bytes()
        .iter()
        .take(len.min(6))
        .filter_map(|byte| {
            let digit = u32::from(*byte).checked_rem(SUFFIX_RADIX)?;
            char::from_digit(digit, SUFFIX_RADIX)
        })
        .map(|character| character.to_ascii_uppercase())
        .collect()
}
