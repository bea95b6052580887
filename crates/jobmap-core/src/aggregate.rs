//! Per-location job counts with at-most-once geocoding per distinct place.

use std::collections::{BTreeMap, BTreeSet};

use crate::geo::{Coordinate, GeoResolver, LocationEntry};
use crate::import::ImportTable;
use crate::job::LOCATION_COLUMN;

/// Result of one aggregation pass, keyed by location name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub counts: BTreeMap<String, u32>,
    /// Resolved coordinate per location, or the default for unresolved ones.
    pub coordinates: BTreeMap<String, Coordinate>,
    pub unresolved: BTreeSet<String>,
    /// Rows that could not be keyed because they had no location column.
    pub skipped_rows: usize,
}

impl Aggregation {
    #[must_use]
    pub fn total_jobs(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    #[must_use]
    pub fn location_count(&self) -> usize {
        self.counts.len()
    }
}

/// Owns the per-pass location cache.
///
/// Each call to [`LocationAggregator::aggregate`] starts from an empty cache,
/// so a location is geocoded at most once per pass.
pub struct LocationAggregator<R> {
    resolver: R,
    default_location: Coordinate,
}

impl<R: GeoResolver> LocationAggregator<R> {
    #[must_use]
    pub fn new(resolver: R, default_location: Coordinate) -> Self {
        Self {
            resolver,
            default_location,
        }
    }

    #[must_use]
    pub fn default_location(&self) -> Coordinate {
        self.default_location
    }

    #[must_use]
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Count jobs per location across the table's data rows, geocoding each
    /// distinct location once. Lookup failures are logged and masked with the
    /// default location; they never abort the pass.
    pub async fn aggregate(&self, table: &ImportTable) -> Aggregation {
        let mut entries: BTreeMap<String, LocationEntry> = BTreeMap::new();
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        let mut skipped_rows = 0usize;

        for (row_number, row) in table.data_rows() {
            let Some(location) = row.get(LOCATION_COLUMN) else {
                tracing::warn!(
                    row = row_number,
                    fields = row.len(),
                    "skipping row without a location column"
                );
                skipped_rows += 1;
                continue;
            };

            if let Some(count) = counts.get_mut(location) {
                *count = count.saturating_add(1);
                continue;
            }

            let entry = self.lookup(location).await;
            entries.insert(location.clone(), entry);
            counts.insert(location.clone(), 1);
        }

        let unresolved: BTreeSet<String> = entries
            .iter()
            .filter(|(_, entry)| !entry.is_resolved())
            .map(|(name, _)| name.clone())
            .collect();

        let coordinates = entries
            .into_iter()
            .map(|(name, entry)| (name, entry.coordinate_or(self.default_location)))
            .collect();

        tracing::info!(
            locations = counts.len(),
            unresolved = unresolved.len(),
            skipped_rows,
            "aggregation pass complete"
        );

        Aggregation {
            counts,
            coordinates,
            unresolved,
            skipped_rows,
        }
    }

    async fn lookup(&self, location: &str) -> LocationEntry {
        match self.resolver.resolve(location).await {
            Ok(Some(coordinate)) => {
                tracing::debug!(location, %coordinate, "resolved location");
                LocationEntry::Resolved(coordinate)
            }
            Ok(None) => {
                tracing::warn!(location, "no geocoding match; using default location");
                LocationEntry::Unresolved
            }
            Err(e) => {
                tracing::warn!(location, error = %e, "geocoding failed; using default location");
                LocationEntry::Unresolved
            }
        }
    }
}
