//! Coordinates and the geocoding boundary.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the valid degree ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] when latitude is outside
    /// `[-90, 90]`, longitude is outside `[-180, 180]`, or either is not finite.
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoreError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::InvalidCoordinate(format!(
                "latitude {lat} out of range"
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoreError::InvalidCoordinate(format!(
                "longitude {lng} out of range"
            )));
        }
        Ok(Self { lat, lng })
    }

    /// Parse a `"lat,lng"` pair such as `"39.9612,-82.9988"`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if the text is not two
    /// comma-separated numbers or the numbers are out of range.
    pub fn parse_pair(raw: &str) -> Result<Self, CoreError> {
        let (lat, lng) = raw.split_once(',').ok_or_else(|| {
            CoreError::InvalidCoordinate(format!("expected 'lat,lng', got '{raw}'"))
        })?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| CoreError::InvalidCoordinate(format!("'{}': {e}", part.trim())))
        };
        Self::new(parse(lat)?, parse(lng)?)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Outcome of geocoding one distinct location during an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationEntry {
    Resolved(Coordinate),
    /// The geocoder failed or had no match; callers substitute the default center.
    Unresolved,
}

impl LocationEntry {
    #[must_use]
    pub fn coordinate_or(self, default: Coordinate) -> Coordinate {
        match self {
            LocationEntry::Resolved(c) => c,
            LocationEntry::Unresolved => default,
        }
    }

    #[must_use]
    pub fn is_resolved(self) -> bool {
        matches!(self, LocationEntry::Resolved(_))
    }
}

/// Turns a free-text place name into a coordinate.
///
/// `Ok(None)` means the lookup succeeded but found nothing. Implementations
/// may be slow or rate-limited; the aggregator calls them at most once per
/// distinct place per pass.
pub trait GeoResolver {
    type Error: std::fmt::Display;

    fn resolve(
        &self,
        place: &str,
    ) -> impl Future<Output = Result<Option<Coordinate>, Self::Error>> + Send;
}
