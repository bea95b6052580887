//! Map plan assembly and the rendering boundary.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::aggregate::Aggregation;
use crate::geo::Coordinate;
use crate::tier::{Tier, TierScale};

/// Marker diameter in pixels.
pub const MARKER_SIZE: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapView {
    pub width: u32,
    pub height: u32,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub location: String,
    pub coordinate: Coordinate,
    pub jobs: u32,
    pub tier: Tier,
    pub resolved: bool,
}

/// Everything a renderer needs: where to look and what to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPlan {
    pub center: Coordinate,
    pub view: MapView,
    pub markers: Vec<MapMarker>,
}

impl MapPlan {
    /// One marker per aggregated location, classified with `scale`, in
    /// location-name order.
    #[must_use]
    pub fn build(
        aggregation: &Aggregation,
        scale: &TierScale,
        center: Coordinate,
        view: MapView,
    ) -> Self {
        let markers = aggregation
            .counts
            .iter()
            .filter_map(|(location, &jobs)| {
                let coordinate = *aggregation.coordinates.get(location)?;
                Some(MapMarker {
                    location: location.clone(),
                    coordinate,
                    jobs,
                    tier: scale.classify(jobs),
                    resolved: !aggregation.unresolved.contains(location),
                })
            })
            .collect();

        Self {
            center,
            view,
            markers,
        }
    }
}

/// Turns a [`MapPlan`] into a renderable artifact.
pub trait MapComposer {
    type Output;
    type Error: std::error::Error;

    /// # Errors
    ///
    /// Implementation-specific rendering failures.
    fn compose(&self, plan: &MapPlan) -> Result<Self::Output, Self::Error>;
}

/// Emits a GeoJSON `FeatureCollection` with simplestyle marker properties,
/// which most map viewers render directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoJsonComposer;

impl MapComposer for GeoJsonComposer {
    type Output = Value;
    type Error = std::convert::Infallible;

    fn compose(&self, plan: &MapPlan) -> Result<Value, Self::Error> {
        let features: Vec<Value> = plan
            .markers
            .iter()
            .map(|m| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        // GeoJSON positions are [longitude, latitude].
                        "coordinates": [m.coordinate.lng, m.coordinate.lat],
                    },
                    "properties": {
                        "location": m.location,
                        "jobs": m.jobs,
                        "tier": m.tier.to_string(),
                        "marker-color": m.tier.color(),
                        "marker-size": MARKER_SIZE,
                        "resolved": m.resolved,
                    },
                })
            })
            .collect();

        Ok(json!({
            "type": "FeatureCollection",
            "center": [plan.center.lng, plan.center.lat],
            "zoom": plan.view.zoom,
            "width": plan.view.width,
            "height": plan.view.height,
            "features": features,
        }))
    }
}
