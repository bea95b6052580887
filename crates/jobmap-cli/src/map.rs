//! `map` command: aggregate job locations and write a GeoJSON map.

use std::path::Path;

use anyhow::Context;
use jobmap_core::{
    load_tier_scale, AppConfig, Coordinate, GeoJsonComposer, GeoResolver, LocationAggregator,
    MapComposer, MapPlan, TierScale,
};
use jobmap_geocode::{NominatimClient, NominatimConfig};

use crate::table::read_import_table;

/// Geocode the configured map center, falling back to `fallback` when the
/// lookup fails or finds nothing.
pub(crate) async fn resolve_center<R: GeoResolver>(
    resolver: &R,
    place: &str,
    fallback: Coordinate,
) -> Coordinate {
    match resolver.resolve(place).await {
        Ok(Some(center)) => center,
        Ok(None) => {
            tracing::warn!(place, %fallback, "map center not found; using fallback");
            fallback
        }
        Err(e) => {
            tracing::warn!(
                place,
                %fallback,
                error = %e,
                "map center lookup failed; using fallback"
            );
            fallback
        }
    }
}

/// Build the map for the jobs in `file` and write it as GeoJSON.
///
/// Locations the geocoder cannot place are drawn at the map center.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the tier file is invalid,
/// the geocoder client cannot be built, or the output cannot be written.
pub(crate) async fn run_map(
    config: &AppConfig,
    file: &Path,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let table = read_import_table(file)?;
    let scale = match &config.tiers_path {
        Some(path) => load_tier_scale(path)?,
        None => TierScale::default(),
    };

    let client = NominatimClient::new(&NominatimConfig::from_app_config(config))?;
    let center = resolve_center(&client, &config.map_center, config.map_fallback_center).await;

    let aggregator = LocationAggregator::new(client, center);
    let aggregation = aggregator.aggregate(&table).await;
    let plan = MapPlan::build(&aggregation, &scale, center, config.map_view);
    let geojson = GeoJsonComposer.compose(&plan)?;

    let output = output.unwrap_or(config.map_output.as_path());
    let rendered = serde_json::to_string_pretty(&geojson)?;
    std::fs::write(output, rendered)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!(
        "mapped {} job(s) across {} location(s) ({} unresolved) to {}",
        aggregation.total_jobs(),
        aggregation.location_count(),
        aggregation.unresolved.len(),
        output.display()
    );
    Ok(())
}
