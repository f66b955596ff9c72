//! Rating model trait and model selection
//!
//! Every model turns a team list and a game list into a [`RatingMap`]. Models
//! are pure: they hold only their tuning config and never fail on degenerate
//! input.

use crate::config::RatingConfig;
use crate::rating::colley::ColleyModel;
use crate::rating::elo::EloModel;
use crate::rating::hybrid::HybridModel;
use crate::rating::massey::MasseyModel;
use crate::types::{Game, RatingMap, RatingMethod, TeamName};

/// Trait for producing team ratings from a season of games
pub trait RatingModel: Send + Sync {
    /// Which method this model implements
    fn method(&self) -> RatingMethod;

    /// Rate every team in `teams` using the qualifying games in `games`
    ///
    /// # Arguments
    /// * `teams` - Tracked team names; the result has exactly these keys
    /// * `games` - Season games; unplayed games and untracked opponents are skipped
    fn rate(&self, teams: &[TeamName], games: &[Game]) -> RatingMap;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;
}

/// Build the model for `method` from the aggregated rating config
pub fn build_model(
    method: RatingMethod,
    config: &RatingConfig,
) -> crate::error::Result<Box<dyn RatingModel>> {
    let model: Box<dyn RatingModel> = match method {
        RatingMethod::Colley => Box::new(ColleyModel::new(config.colley.clone())?),
        RatingMethod::Massey => Box::new(MasseyModel::new(config.massey.clone())?),
        RatingMethod::Elo => Box::new(EloModel::new(config.elo.clone())?),
        RatingMethod::Hybrid => Box::new(HybridModel::new(
            config.colley.clone(),
            config.massey.clone(),
            config.hybrid.clone(),
        )?),
    };
    Ok(model)
}

/// Rate `teams` with `method` in one call
pub fn compute_ratings(
    method: RatingMethod,
    config: &RatingConfig,
    teams: &[TeamName],
    games: &[Game],
) -> crate::error::Result<RatingMap> {
    Ok(build_model(method, config)?.rate(teams, games))
}
