//! Route description embedded in a transport task.

use super::TransportDomainError;
use serde::{Deserialize, Serialize};

/// Planned route of a transport leg.
///
/// The description is a JSON document listing waypoints; it is validated
/// as JSON but otherwise opaque.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransportRoute {
    route_json: Option<String>,
    distance_km: f64,
}

impl TransportRoute {
    /// Creates a route from a JSON waypoint description and a distance.
    ///
    /// A blank description means no route was planned.
    ///
    /// # Errors
    ///
    /// Returns [`TransportDomainError::InvalidRoute`] when the description is
    /// not JSON, or [`TransportDomainError::InvalidDistance`] when the
    /// distance is negative or not finite.
    pub fn new(route_json: &str, distance_km: f64) -> Result<Self, TransportDomainError> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(TransportDomainError::InvalidDistance);
        }
        let trimmed = route_json.trim();
        if trimmed.is_empty() {
            return Ok(Self {
                route_json: None,
                distance_km,
            });
        }
        serde_json::from_str::<serde_json::Value>(trimmed)
            .map_err(|err| TransportDomainError::InvalidRoute(err.to_string()))?;
        Ok(Self {
            route_json: Some(trimmed.to_owned()),
            distance_km,
        })
    }

    /// Returns the JSON waypoint description, if a route was planned.
    #[must_use]
    pub fn route_json(&self) -> Option<&str> {
        self.route_json.as_deref()
    }

    /// Returns the distance in kilometres.
    #[must_use]
    pub const fn distance_km(&self) -> f64 {
        self.distance_km
    }
}
