//! Massey least-squares rating
//!
//! Each qualifying game contributes one observation `r_home - r_away = y` with
//! `y = clamp(home_points - away_points - hfa, -max_margin, max_margin)`.
//! The normal equations `AᵀA + λI` and `Aᵀy` are accumulated game by game,
//! then the last equation is replaced with `Σ r = 0` so the ratings are
//! centred on zero.

use crate::rating::calculator::RatingModel;
use crate::rating::linalg::{LinearSystem, SolveOutcome};
use crate::types::{Game, RatingMap, RatingMethod, TeamName};
use crate::utils::{scored_games, team_index, to_rating_map};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configuration for the Massey solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasseyConfig {
    /// Ridge term added to the diagonal of the normal equations
    pub ridge_lambda: f64,
    /// Points subtracted from every home margin
    pub home_field_advantage: f64,
    /// Adjusted margins are clamped to `[-max_margin, max_margin]`
    pub max_margin: f64,
}

impl Default for MasseyConfig {
    fn default() -> Self {
        Self {
            ridge_lambda: 0.01,
            home_field_advantage: 2.1,
            max_margin: 50.0,
        }
    }
}

impl MasseyConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.ridge_lambda.is_finite() || self.ridge_lambda < 0.0 {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Massey ridge lambda must be non-negative".to_string(),
            }
            .into());
        }

        if !self.home_field_advantage.is_finite() {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Massey home field advantage must be finite".to_string(),
            }
            .into());
        }

        if self.max_margin.is_nan() || self.max_margin <= 0.0 {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Massey max margin must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Home margin after the HFA adjustment and the blowout cap
    pub fn adjusted_margin(&self, home_points: i32, away_points: i32) -> f64 {
        let raw = f64::from(home_points - away_points) - self.home_field_advantage;
        raw.clamp(-self.max_margin, self.max_margin)
    }
}

/// Build the anchored Massey normal equations for `teams`
///
/// With no qualifying games the system is all zeros and solves to all-zero
/// ratings through the singular fallback.
pub fn build_massey(teams: &[TeamName], games: &[Game], config: &MasseyConfig) -> LinearSystem {
    let n = teams.len();
    let mut system = LinearSystem::zeros(n);
    if n == 0 {
        return system;
    }

    let index = team_index(teams);
    let mut observations = 0usize;
    for game in scored_games(&index, games) {
        let (i, j) = (game.home, game.away);
        let y = config.adjusted_margin(game.home_points, game.away_points);

        // Row of A is +1 at home, -1 at away
        system.coefficients[i][i] += 1.0;
        system.coefficients[j][j] += 1.0;
        system.coefficients[i][j] -= 1.0;
        system.coefficients[j][i] -= 1.0;
        system.rhs[i] += y;
        system.rhs[j] -= y;
        observations += 1;
    }

    if observations == 0 {
        return system;
    }

    for (i, row) in system.coefficients.iter_mut().enumerate() {
        row[i] += config.ridge_lambda;
    }

    // Sum of all ratings = 0 replaces the last equation
    if let Some(last) = system.coefficients.last_mut() {
        last.iter_mut().for_each(|v| *v = 1.0);
    }
    if let Some(last) = system.rhs.last_mut() {
        *last = 0.0;
    }

    debug!(
        "Built Massey system: {} teams, {} observations",
        n, observations
    );
    system
}

/// Solve a Massey system, falling back to all-zero ratings when it is singular
pub fn solve_massey(system: &LinearSystem) -> Vec<f64> {
    let n = system.dimension();
    match system.solve() {
        SolveOutcome::Solved(ratings) => ratings,
        SolveOutcome::Singular => {
            let has_observations = system.coefficients.iter().flatten().any(|v| *v != 0.0);
            if has_observations {
                warn!(
                    "Massey system for {} teams is singular, using zero ratings",
                    n
                );
            }
            vec![0.0; n]
        }
    }
}

/// Massey ratings keyed by team
pub fn massey_ratings(teams: &[TeamName], games: &[Game], config: &MasseyConfig) -> RatingMap {
    let system = build_massey(teams, games, config);
    to_rating_map(teams, &solve_massey(&system))
}

/// Massey rating model
#[derive(Debug, Clone)]
pub struct MasseyModel {
    config: MasseyConfig,
}

impl MasseyModel {
    /// Create a new Massey model
    pub fn new(config: MasseyConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl RatingModel for MasseyModel {
    fn method(&self) -> RatingMethod {
        RatingMethod::Massey
    }

    fn rate(&self, teams: &[TeamName], games: &[Game]) -> RatingMap {
        massey_ratings(teams, games, &self.config)
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams(names: &[&str]) -> Vec<TeamName> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_massey_config_validation() {
        let mut config = MasseyConfig::default();
        assert!(config.validate().is_ok());

        config.ridge_lambda = -0.1;
        assert!(config.validate().is_err());

        config = MasseyConfig::default();
        config.max_margin = 0.0;
        assert!(config.validate().is_err());

        config = MasseyConfig::default();
        config.home_field_advantage = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_adjusted_margin_is_capped() {
        let config = MasseyConfig::default();
        assert!((config.adjusted_margin(28, 21) - 4.9).abs() < 1e-12);
        assert_eq!(config.adjusted_margin(100, 0), 50.0);
        assert_eq!(config.adjusted_margin(0, 100), -50.0);
    }

    #[test]
    fn test_massey_empty_team_list() {
        let system = build_massey(&[], &[], &MasseyConfig::default());
        assert!(system.is_empty());
        assert!(solve_massey(&system).is_empty());
    }

    #[test]
    fn test_massey_no_games_returns_zeros() {
        let teams = teams(&["A", "B", "C"]);
        let system = build_massey(&teams, &[], &MasseyConfig::default());
        assert_eq!(system, LinearSystem::zeros(3));

        let ratings = massey_ratings(&teams, &[], &MasseyConfig::default());
        assert_eq!(ratings.len(), 3);
        assert!(ratings.values().all(|r| *r == 0.0));
    }

    #[test]
    fn test_massey_two_team_closed_form() {
        // (1 + λ) rA - rB = y and rA + rB = 0 give rA = y / (2 + λ)
        let teams = teams(&["A", "B"]);
        let games = vec![Game::final_score(2024, 1, "A", 28, "B", 21)];
        let config = MasseyConfig::default();
        let ratings = massey_ratings(&teams, &games, &config);

        let expected = 4.9 / 2.01;
        assert!((ratings["A"] - expected).abs() < 1e-9);
        assert!((ratings["B"] + expected).abs() < 1e-9);
    }

    #[test]
    fn test_massey_anchor_centres_ratings() {
        let teams = teams(&["A", "B", "C", "D"]);
        let games = vec![
            Game::final_score(2024, 1, "A", 31, "B", 10),
            Game::final_score(2024, 1, "C", 17, "D", 20),
            Game::final_score(2024, 2, "A", 24, "C", 21),
            Game::final_score(2024, 2, "B", 3, "D", 42),
        ];
        let ratings = massey_ratings(&teams, &games, &MasseyConfig::default());
        let total: f64 = ratings.values().sum();
        assert!(total.abs() < 1e-9);
        assert!(ratings["A"] > ratings["B"]);
        assert!(ratings["D"] > ratings["B"]);
    }

    #[test]
    fn test_massey_isolated_team_stays_finite() {
        let teams = teams(&["A", "B", "C"]);
        let games = vec![Game::final_score(2024, 1, "A", 28, "B", 21)];
        let ratings = massey_ratings(&teams, &games, &MasseyConfig::default());
        assert_eq!(ratings.len(), 3);
        assert!(ratings.values().all(|r| r.is_finite()));
        assert!(ratings["A"] > ratings["B"]);
    }

    #[test]
    fn test_smaller_cap_narrows_blowout_gap() {
        let teams = teams(&["A", "B"]);
        let games = vec![Game::final_score(2024, 1, "A", 100, "B", 0)];
        let capped = massey_ratings(&teams, &games, &MasseyConfig::default());
        let uncapped = massey_ratings(
            &teams,
            &games,
            &MasseyConfig {
                max_margin: 1000.0,
                ..Default::default()
            },
        );
        let capped_gap = (capped["A"] - capped["B"]).abs();
        let uncapped_gap = (uncapped["A"] - uncapped["B"]).abs();
        assert!(capped_gap < uncapped_gap);
    }
}
