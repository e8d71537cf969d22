//! Signature captured when a parcel is handed over.

use super::ParseSignTypeError;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a mobile number eligible for masking.
const MOBILE_NUMBER_LENGTH: usize = 11;

/// Trailing digits left visible by [`mask_phone`].
const VISIBLE_DIGITS: usize = 4;

/// How a parcel was signed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignType {
    /// Signed by the receiver in person.
    Person,
    /// Left in a parcel locker.
    Signboard,
    /// Signed by someone on the receiver's behalf.
    Agent,
}

impl SignType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Signboard => "signboard",
            Self::Agent => "agent",
        }
    }
}

impl TryFrom<&str> for SignType {
    type Error = ParseSignTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "person" => Ok(Self::Person),
            "signboard" => Ok(Self::Signboard),
            "agent" => Ok(Self::Agent),
            _ => Err(ParseSignTypeError(value.to_owned())),
        }
    }
}

impl fmt::Display for SignType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Masks an 11-digit mobile number down to its last four digits.
///
/// Anything else is returned unchanged.
///
/// ```
/// use parcel_flow::delivery::domain::mask_phone;
///
/// assert_eq!(mask_phone("13987654321"), "*******4321");
/// assert_eq!(mask_phone("0571-8888"), "0571-8888");
/// ```
#[must_use]
pub fn mask_phone(phone: &str) -> String {
    let is_mobile = phone.chars().count() == MOBILE_NUMBER_LENGTH
        && phone.chars().all(|character| character.is_ascii_digit());
    if !is_mobile {
        return phone.to_owned();
    }
    let hidden = MOBILE_NUMBER_LENGTH - VISIBLE_DIGITS;
    let mut masked = "*".repeat(hidden);
    masked.extend(phone.chars().skip(hidden));
    masked
}

/// Signature recorded on a delivery binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInfo {
    signer_name: String,
    signer_phone: String,
    signed_at: DateTime<Utc>,
    sign_type: SignType,
    remark: String,
}

/// Parameter object for reconstructing a persisted signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSignInfo {
    /// Persisted signer name.
    pub signer_name: String,
    /// Persisted, already masked, signer phone.
    pub signer_phone: String,
    /// Persisted signing timestamp.
    pub signed_at: DateTime<Utc>,
    /// Persisted sign type.
    pub sign_type: SignType,
    /// Persisted remark.
    pub remark: String,
}

impl SignInfo {
    /// Records a signature at the current clock time, masking the phone.
    #[must_use]
    pub fn signed(
        signer_name: &str,
        signer_phone: &str,
        sign_type: SignType,
        remark: &str,
        clock: &impl Clock,
    ) -> Self {
        Self {
            signer_name: signer_name.trim().to_owned(),
            signer_phone: mask_phone(signer_phone.trim()),
            signed_at: clock.utc(),
            sign_type,
            remark: remark.trim().to_owned(),
        }
    }

    /// Reconstructs a signature from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSignInfo) -> Self {
        Self {
            signer_name: data.signer_name,
            signer_phone: data.signer_phone,
            signed_at: data.signed_at,
            sign_type: data.sign_type,
            remark: data.remark,
        }
    }

    /// Returns the signer name.
    #[must_use]
    pub fn signer_name(&self) -> &str {
        &self.signer_name
    }

    /// Returns the masked signer phone.
    #[must_use]
    pub fn signer_phone(&self) -> &str {
        &self.signer_phone
    }

    /// Returns when the parcel was signed for.
    #[must_use]
    pub const fn signed_at(&self) -> DateTime<Utc> {
        self.signed_at
    }

    /// Returns how the parcel was signed for.
    #[must_use]
    pub const fn sign_type(&self) -> SignType {
        self.sign_type
    }

    /// Returns the remark.
    #[must_use]
    pub fn remark(&self) -> &str {
        &self.remark
    }
}
