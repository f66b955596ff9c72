//! Robust conference strength
//!
//! Each conference is scored from the median of its top slice ("elite") and
//! the median of a middle band ("depth"). Composite scores across all
//! conferences are then rescaled linearly into [`CONFERENCE_BAND`].

use crate::types::{ConferenceMap, ConferenceStrengthMap, RatingMap};
use crate::utils::median_sorted;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Output band of conference strength
pub const CONFERENCE_BAND: (f64, f64) = (0.6, 1.6);

/// Bucket for teams without a conference entry
pub const UNKNOWN_CONFERENCE: &str = "Unknown";

/// Configuration for the robust conference strength score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConferenceStrengthConfig {
    /// Fraction of each conference treated as its elite slice
    pub top_percent: f64,
    /// Lower edge of the depth band, as a fraction of the conference
    pub mid_lo: f64,
    /// Upper edge of the depth band
    pub mid_hi: f64,
    pub elite_weight: f64,
    pub depth_weight: f64,
}

impl Default for ConferenceStrengthConfig {
    fn default() -> Self {
        Self {
            top_percent: 0.35,
            mid_lo: 0.40,
            mid_hi: 0.60,
            elite_weight: 0.65,
            depth_weight: 0.35,
        }
    }
}

impl ConferenceStrengthConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        let fractions = [self.top_percent, self.mid_lo, self.mid_hi];
        if fractions.iter().any(|f| !(0.0..=1.0).contains(f)) {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Conference slice fractions must be between 0 and 1".to_string(),
            }
            .into());
        }

        if self.mid_lo > self.mid_hi {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Conference depth band lower edge exceeds upper edge".to_string(),
            }
            .into());
        }

        if !self.elite_weight.is_finite() || !self.depth_weight.is_finite() {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Conference weights must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Composite score of one conference from its ascending-sorted ratings
///
/// Returns `None` for an empty slice.
pub fn conference_composite(sorted: &[f64], config: &ConferenceStrengthConfig) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }

    let cut = (n as f64 * (1.0 - config.top_percent)).floor().max(0.0) as usize;
    let elite = if cut < n { &sorted[cut..] } else { &sorted[n - 1..] };
    let elite_median = median_sorted(elite)?;

    let lo = (n as f64 * config.mid_lo).floor().max(0.0) as usize;
    let hi = ((n as f64 * config.mid_hi).floor() as usize).min(n);
    let depth = if hi > lo {
        &sorted[lo..hi]
    } else {
        &sorted[lo.min(n)..(lo + 1).min(n)]
    };
    let depth_median = median_sorted(depth).or_else(|| median_sorted(sorted))?;

    Some(config.elite_weight * elite_median + config.depth_weight * depth_median)
}

/// Map `value` from `[src_lo, src_hi]` onto `band`; a collapsed source range
/// maps to the middle of the band
pub fn band_scale(value: f64, src_lo: f64, src_hi: f64, band: (f64, f64)) -> f64 {
    let (lo, hi) = band;
    if src_hi <= src_lo {
        return (lo + hi) / 2.0;
    }
    let t = ((value - src_lo) / (src_hi - src_lo)).clamp(0.0, 1.0);
    lo * (1.0 - t) + hi * t
}

/// Strength of every conference present in `ratings`, each in [`CONFERENCE_BAND`]
pub fn conference_strength(
    ratings: &RatingMap,
    conference_map: &ConferenceMap,
    config: &ConferenceStrengthConfig,
) -> ConferenceStrengthMap {
    let mut grouped: HashMap<&str, Vec<f64>> = HashMap::new();
    for (team, rating) in ratings {
        let conference = conference_map
            .get(team)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_CONFERENCE);
        grouped.entry(conference).or_default().push(*rating);
    }

    let scores: Vec<(&str, f64)> = grouped
        .into_iter()
        .filter_map(|(conference, mut values)| {
            values.sort_by(|a, b| a.total_cmp(b));
            conference_composite(&values, config).map(|score| (conference, score))
        })
        .collect();

    let src_lo = scores.iter().map(|(_, s)| *s).fold(f64::INFINITY, f64::min);
    let src_hi = scores.iter().map(|(_, s)| *s).fold(f64::NEG_INFINITY, f64::max);

    scores
        .into_iter()
        .map(|(conference, score)| {
            (
                conference.to_string(),
                band_scale(score, src_lo, src_hi, CONFERENCE_BAND),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(ConferenceStrengthConfig::default().validate().is_ok());

        let mut config = ConferenceStrengthConfig::default();
        config.top_percent = 1.5;
        assert!(config.validate().is_err());

        config = ConferenceStrengthConfig::default();
        config.mid_lo = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_composite_slices() {
        let config = ConferenceStrengthConfig::default();
        // n = 10: elite = sorted[6..] -> median 8.5, depth = sorted[4..6] -> median 5.5
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let composite = conference_composite(&values, &config).unwrap();
        assert!((composite - (0.65 * 8.5 + 0.35 * 5.5)).abs() < 1e-12);
    }

    #[test]
    fn test_composite_small_conferences() {
        let config = ConferenceStrengthConfig::default();
        assert_eq!(conference_composite(&[], &config), None);
        // One team: both slices are that team
        assert!((conference_composite(&[2.0], &config).unwrap() - 2.0).abs() < 1e-12);
        // Two teams: elite = [4.0], depth = sorted[0..1]
        let two = conference_composite(&[1.0, 4.0], &config).unwrap();
        assert!((two - (0.65 * 4.0 + 0.35 * 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_band_scale() {
        assert_eq!(band_scale(0.0, 0.0, 10.0, CONFERENCE_BAND), 0.6);
        assert_eq!(band_scale(10.0, 0.0, 10.0, CONFERENCE_BAND), 1.6);
        assert!((band_scale(5.0, 0.0, 10.0, CONFERENCE_BAND) - 1.1).abs() < 1e-12);
        assert!((band_scale(3.0, 3.0, 3.0, CONFERENCE_BAND) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_conference_strength_band_and_unknown_bucket() {
        let ratings = RatingMap::from([
            ("Georgia".to_string(), 0.9),
            ("Alabama".to_string(), 0.8),
            ("Kansas".to_string(), 0.4),
            ("Iowa State".to_string(), 0.5),
            ("Notre Dame".to_string(), 0.7),
        ]);
        let conferences = ConferenceMap::from([
            ("Georgia".to_string(), "SEC".to_string()),
            ("Alabama".to_string(), "SEC".to_string()),
            ("Kansas".to_string(), "Big 12".to_string()),
            ("Iowa State".to_string(), "Big 12".to_string()),
        ]);
        let strength =
            conference_strength(&ratings, &conferences, &ConferenceStrengthConfig::default());

        assert_eq!(strength.len(), 3);
        assert_eq!(strength["SEC"], 1.6);
        assert_eq!(strength["Big 12"], 0.6);
        assert!(strength.contains_key(UNKNOWN_CONFERENCE));
        assert!(strength
            .values()
            .all(|s| (CONFERENCE_BAND.0..=CONFERENCE_BAND.1).contains(s)));
    }

    #[test]
    fn test_single_conference_maps_to_midpoint() {
        let ratings = RatingMap::from([("A".to_string(), 3.0), ("B".to_string(), 1.0)]);
        let conferences = ConferenceMap::from([
            ("A".to_string(), "MAC".to_string()),
            ("B".to_string(), "MAC".to_string()),
        ]);
        let strength =
            conference_strength(&ratings, &conferences, &ConferenceStrengthConfig::default());
        assert!((strength["MAC"] - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_empty_ratings() {
        let strength = conference_strength(
            &RatingMap::new(),
            &ConferenceMap::new(),
            &ConferenceStrengthConfig::default(),
        );
        assert!(strength.is_empty());
    }
}
