//! Hybrid rating: z-scored Colley and Massey blended linearly
//!
//! The blend has no fixed scale; it is only meaningful as a ranking signal.

use crate::rating::calculator::RatingModel;
use crate::rating::colley::{build_colley, solve_colley, ColleyConfig};
use crate::rating::massey::{build_massey, solve_massey, MasseyConfig};
use crate::types::{Game, RatingMap, RatingMethod, TeamName};
use crate::utils::{mean, to_rating_map};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Standard deviations below this are treated as 1.0
const STDEV_EPSILON: f64 = 1e-8;

/// Blend weights for the hybrid rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HybridConfig {
    pub colley_weight: f64,
    pub massey_weight: f64,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            colley_weight: 0.5,
            massey_weight: 0.5,
        }
    }
}

impl HybridConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.colley_weight.is_finite() || !self.massey_weight.is_finite() {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Hybrid blend weights must be finite".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Subtract the mean and divide by the population standard deviation
pub fn zscore(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let variance = mean(&values.iter().map(|v| (v - m).powi(2)).collect::<Vec<_>>());
    let mut stdev = variance.sqrt();
    if stdev < STDEV_EPSILON {
        stdev = 1.0;
    }
    values.iter().map(|v| (v - m) / stdev).collect()
}

/// Hybrid ratings keyed by team
pub fn hybrid_ratings(
    teams: &[TeamName],
    games: &[Game],
    colley: &ColleyConfig,
    massey: &MasseyConfig,
    blend: &HybridConfig,
) -> RatingMap {
    let colley_r = solve_colley(&build_colley(teams, games, colley.prior_strength));
    let massey_r = solve_massey(&build_massey(teams, games, massey));

    let blended: Vec<f64> = zscore(&colley_r)
        .iter()
        .zip(zscore(&massey_r))
        .map(|(zc, zm)| blend.colley_weight * zc + blend.massey_weight * zm)
        .collect();

    debug!("Blended Colley and Massey for {} teams", teams.len());
    to_rating_map(teams, &blended)
}

/// Hybrid rating model
#[derive(Debug, Clone)]
pub struct HybridModel {
    colley: ColleyConfig,
    massey: MasseyConfig,
    blend: HybridConfig,
}

impl HybridModel {
    /// Create a new hybrid model from the two solver configs and the blend weights
    pub fn new(
        colley: ColleyConfig,
        massey: MasseyConfig,
        blend: HybridConfig,
    ) -> crate::error::Result<Self> {
        colley.validate()?;
        massey.validate()?;
        blend.validate()?;
        Ok(Self {
            colley,
            massey,
            blend,
        })
    }
}

impl RatingModel for HybridModel {
    fn method(&self) -> RatingMethod {
        RatingMethod::Hybrid
    }

    fn rate(&self, teams: &[TeamName], games: &[Game]) -> RatingMap {
        hybrid_ratings(teams, games, &self.colley, &self.massey, &self.blend)
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "colley": self.colley,
            "massey": self.massey,
            "blend": self.blend,
        })
    }
}
