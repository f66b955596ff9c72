//! Colley matrix rating
//!
//! Builds `C r = b` with `C = diag(prior + games_played) - opponents` and
//! `b = prior / 2 + (wins - losses) / 2`. Ties count half a win and half a
//! loss for both sides. A singular system yields a uniform 0.5 for every team.

use crate::rating::calculator::RatingModel;
use crate::rating::linalg::{LinearSystem, SolveOutcome};
use crate::types::{Game, RatingMap, RatingMethod, TeamName};
use crate::utils::{scored_games, team_index, to_rating_map};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Rating assigned to every team when the Colley system cannot be solved
pub const COLLEY_FALLBACK_RATING: f64 = 0.5;

/// Configuration for the Colley solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColleyConfig {
    /// Strength of the prior pulling every team toward 0.5
    pub prior_strength: f64,
}

impl Default for ColleyConfig {
    fn default() -> Self {
        Self {
            prior_strength: 2.0,
        }
    }
}

impl ColleyConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.prior_strength.is_finite() || self.prior_strength < 0.0 {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Colley prior strength must be a non-negative number".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Build the Colley system for `teams` from the qualifying games
pub fn build_colley(teams: &[TeamName], games: &[Game], prior_strength: f64) -> LinearSystem {
    let n = teams.len();
    if n == 0 {
        return LinearSystem::zeros(0);
    }

    let index = team_index(teams);
    let mut wins = vec![0.0; n];
    let mut losses = vec![0.0; n];
    let mut games_played = vec![0.0; n];
    let mut opponents = vec![vec![0.0; n]; n];

    for game in scored_games(&index, games) {
        let (i, j) = (game.home, game.away);
        games_played[i] += 1.0;
        games_played[j] += 1.0;
        opponents[i][j] += 1.0;
        opponents[j][i] += 1.0;

        match game.home_points.cmp(&game.away_points) {
            Ordering::Greater => {
                wins[i] += 1.0;
                losses[j] += 1.0;
            }
            Ordering::Less => {
                wins[j] += 1.0;
                losses[i] += 1.0;
            }
            Ordering::Equal => {
                wins[i] += 0.5;
                wins[j] += 0.5;
                losses[i] += 0.5;
                losses[j] += 0.5;
            }
        }
    }

    let coefficients = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| {
                    if i == j {
                        prior_strength + games_played[i]
                    } else {
                        -opponents[i][j]
                    }
                })
                .collect()
        })
        .collect();
    let rhs = (0..n)
        .map(|i| prior_strength / 2.0 + 0.5 * (wins[i] - losses[i]))
        .collect();

    LinearSystem { coefficients, rhs }
}

/// Solve a Colley system, falling back to a uniform 0.5 when it is singular
pub fn solve_colley(system: &LinearSystem) -> Vec<f64> {
    if system.is_empty() {
        return Vec::new();
    }
    let n = system.dimension();
    match system.solve() {
        SolveOutcome::Solved(ratings) => ratings,
        SolveOutcome::Singular => {
            warn!(
                "Colley system for {} teams is singular, using uniform {} ratings",
                n, COLLEY_FALLBACK_RATING
            );
            vec![COLLEY_FALLBACK_RATING; n]
        }
    }
}

/// Colley ratings keyed by team
pub fn colley_ratings(teams: &[TeamName], games: &[Game], config: &ColleyConfig) -> RatingMap {
    let system = build_colley(teams, games, config.prior_strength);
    to_rating_map(teams, &solve_colley(&system))
}

/// Colley rating model
#[derive(Debug, Clone)]
pub struct ColleyModel {
    config: ColleyConfig,
}

impl ColleyModel {
    /// Create a new Colley model
    pub fn new(config: ColleyConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl RatingModel for ColleyModel {
    fn method(&self) -> RatingMethod {
        RatingMethod::Colley
    }

    fn rate(&self, teams: &[TeamName], games: &[Game]) -> RatingMap {
        debug!("Computing Colley ratings for {} teams", teams.len());
        colley_ratings(teams, games, &self.config)
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }
}
