//! Map marker tiers: job counts bucketed into colored density classes.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Visual density buckets, declared from least to most intense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Sparse,
    Low,
    Moderate,
    Elevated,
    High,
    VeryHigh,
    Peak,
}

impl Tier {
    /// Intensity rank; higher is hotter.
    #[must_use]
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// Marker fill color as `#RRGGBB`.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Tier::Sparse => "#FFFF00",
            Tier::Low => "#101010",
            Tier::Moderate => "#FF00FF",
            Tier::Elevated => "#FF0000",
            Tier::High => "#0000FF",
            Tier::VeryHigh => "#00FFFF",
            Tier::Peak => "#00FF00",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Tier::Sparse => "sparse",
            Tier::Low => "low",
            Tier::Moderate => "moderate",
            Tier::Elevated => "elevated",
            Tier::High => "high",
            Tier::VeryHigh => "very_high",
            Tier::Peak => "peak",
        };
        f.write_str(name)
    }
}

/// Counts strictly greater than `above` land in `tier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBand {
    pub above: u32,
    pub tier: Tier,
}

/// Ordered band list plus the catch-all tier for small counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierScale {
    bands: Vec<TierBand>,
    floor: Tier,
}

impl Default for TierScale {
    fn default() -> Self {
        Self {
            bands: vec![
                TierBand { above: 75, tier: Tier::Peak },
                TierBand { above: 50, tier: Tier::VeryHigh },
                TierBand { above: 25, tier: Tier::High },
                TierBand { above: 10, tier: Tier::Elevated },
                TierBand { above: 5, tier: Tier::Moderate },
                TierBand { above: 1, tier: Tier::Low },
            ],
            floor: Tier::Sparse,
        }
    }
}

impl TierScale {
    /// Build a scale from bands in any order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the bands are empty, repeat a
    /// threshold, or would let a larger count map to a less intense tier.
    pub fn new(mut bands: Vec<TierBand>, floor: Tier) -> Result<Self, ConfigError> {
        if bands.is_empty() {
            return Err(ConfigError::Validation(
                "tier scale needs at least one band".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for band in &bands {
            if !seen.insert(band.above) {
                return Err(ConfigError::Validation(format!(
                    "duplicate tier threshold {}",
                    band.above
                )));
            }
        }

        bands.sort_by(|a, b| b.above.cmp(&a.above));

        for pair in bands.windows(2) {
            if pair[0].tier < pair[1].tier {
                return Err(ConfigError::Validation(format!(
                    "threshold {} maps to {} but lower threshold {} maps to hotter tier {}",
                    pair[0].above, pair[0].tier, pair[1].above, pair[1].tier
                )));
            }
        }

        if let Some(lowest) = bands.last() {
            if lowest.tier < floor {
                return Err(ConfigError::Validation(format!(
                    "floor tier {floor} is hotter than the lowest band ({} above {})",
                    lowest.tier, lowest.above
                )));
            }
        }

        Ok(Self { bands, floor })
    }

    /// Classify a job count; the first band (highest threshold first) that
    /// the count exceeds wins.
    #[must_use]
    pub fn classify(&self, count: u32) -> Tier {
        self.bands
            .iter()
            .find(|band| count > band.above)
            .map_or(self.floor, |band| band.tier)
    }

    /// Bands ordered from highest threshold to lowest.
    #[must_use]
    pub fn bands(&self) -> &[TierBand] {
        &self.bands
    }

    #[must_use]
    pub fn floor(&self) -> Tier {
        self.floor
    }
}

#[derive(Debug, Deserialize)]
struct TiersFile {
    bands: Vec<TierBand>,
    floor: Tier,
}

/// Load and validate a tier scale from a YAML file:
///
/// ```yaml
/// floor: sparse
/// bands:
///   - { above: 75, tier: peak }
///   - { above: 1, tier: low }
/// ```
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_tier_scale(path: &Path) -> Result<TierScale, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::TiersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_tier_scale(&content)
}

fn parse_tier_scale(content: &str) -> Result<TierScale, ConfigError> {
    let file: TiersFile = serde_yaml::from_str(content)?;
    TierScale::new(file.bands, file.floor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_matches_reference_counts() {
        let scale = TierScale::default();
        let cases = [
            (0, Tier::Sparse),
            (1, Tier::Sparse),
            (2, Tier::Low),
            (5, Tier::Low),
            (6, Tier::Moderate),
            (10, Tier::Moderate),
            (11, Tier::Elevated),
            (25, Tier::Elevated),
            (26, Tier::High),
            (50, Tier::High),
            (51, Tier::VeryHigh),
            (75, Tier::VeryHigh),
            (76, Tier::Peak),
            (10_000, Tier::Peak),
        ];
        for (count, expected) in cases {
            assert_eq!(scale.classify(count), expected, "count {count}");
        }
    }

    #[test]
    fn default_scale_is_monotonic() {
        let scale = TierScale::default();
        let ranks: Vec<u8> = [0, 1, 5, 10, 25, 50, 75, 76]
            .into_iter()
            .map(|c| scale.classify(c).rank())
            .collect();
        assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "ranks: {ranks:?}");

        let mut previous = scale.classify(0);
        for count in 1..=200 {
            let tier = scale.classify(count);
            assert!(tier >= previous, "count {count} dropped to {tier}");
            previous = tier;
        }
    }

    #[test]
    fn new_sorts_bands_highest_first() {
        let scale = TierScale::new(
            vec![
                TierBand { above: 2, tier: Tier::Low },
                TierBand { above: 20, tier: Tier::Peak },
            ],
            Tier::Sparse,
        )
        .unwrap();
        assert_eq!(scale.bands()[0].above, 20);
        assert_eq!(scale.classify(3), Tier::Low);
        assert_eq!(scale.classify(21), Tier::Peak);
        assert_eq!(scale.classify(2), Tier::Sparse);
    }

    #[test]
    fn new_rejects_inverted_bands() {
        let err = TierScale::new(
            vec![
                TierBand { above: 50, tier: Tier::Low },
                TierBand { above: 10, tier: Tier::Peak },
            ],
            Tier::Sparse,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn new_rejects_duplicate_thresholds() {
        let err = TierScale::new(
            vec![
                TierBand { above: 5, tier: Tier::Low },
                TierBand { above: 5, tier: Tier::High },
            ],
            Tier::Sparse,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn new_rejects_hot_floor() {
        let err = TierScale::new(vec![TierBand { above: 5, tier: Tier::Low }], Tier::Peak)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn new_rejects_empty_bands() {
        assert!(TierScale::new(Vec::new(), Tier::Sparse).is_err());
    }

    #[test]
    fn parse_tier_scale_reads_yaml() {
        let yaml = "floor: sparse\nbands:\n  - { above: 1, tier: low }\n  - { above: 9, tier: very_high }\n";
        let scale = parse_tier_scale(yaml).unwrap();
        assert_eq!(scale.floor(), Tier::Sparse);
        assert_eq!(scale.classify(10), Tier::VeryHigh);
        assert_eq!(scale.classify(9), Tier::Low);
    }

    #[test]
    fn parse_tier_scale_rejects_unknown_tier() {
        let yaml = "floor: sparse\nbands:\n  - { above: 1, tier: scorching }\n";
        assert!(matches!(
            parse_tier_scale(yaml),
            Err(ConfigError::TiersFileParse(_))
        ));
    }

    #[test]
    fn load_tier_scale_reports_missing_file() {
        let err = load_tier_scale(Path::new("/nonexistent/tiers.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::TiersFileIo { .. }));
    }

    #[test]
    fn colors_are_distinct() {
        let tiers = [
            Tier::Sparse,
            Tier::Low,
            Tier::Moderate,
            Tier::Elevated,
            Tier::High,
            Tier::VeryHigh,
            Tier::Peak,
        ];
        let colors: HashSet<&str> = tiers.iter().map(|t| t.color()).collect();
        assert_eq!(colors.len(), tiers.len());
    }
}
