//! Rating system configuration

use crate::analytics::{ConferenceStrengthConfig, PPointsConfig};
use crate::rating::{ColleyConfig, EloConfig, HybridConfig, MasseyConfig};
use serde::{Deserialize, Serialize};

/// Tuning for every rating model and analytic, one table per concern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub colley: ColleyConfig,
    pub massey: MasseyConfig,
    pub elo: EloConfig,
    pub hybrid: HybridConfig,
    pub conference: ConferenceStrengthConfig,
    pub ppoints: PPointsConfig,
}

impl RatingConfig {
    /// Validate every section
    pub fn validate(&self) -> crate::error::Result<()> {
        self.colley.validate()?;
        self.massey.validate()?;
        self.elo.validate()?;
        self.hybrid.validate()?;
        self.conference.validate()?;
        self.ppoints.validate()
    }
}
