//! Chronological Elo with margin-of-victory scaling
//!
//! Games are replayed in `(season, week, id)` order, so the result depends on
//! that order and not on the order of the input slice. Whenever the week
//! changes every rating is pulled toward the initial rating by
//! `regress_to_mean` before the new week's games are applied.

use crate::rating::calculator::RatingModel;
use crate::types::{Game, RatingMap, RatingMethod, TeamName};
use crate::utils::{scored_games, team_index, to_rating_map, ScoredGame};
use serde::{Deserialize, Serialize};
use skillratings::elo::{expected_score, EloRating};
use std::cmp::Ordering;
use tracing::debug;

/// Rating gap scale of the expected-blowout discount
const MARGIN_DISCOUNT_SCALE: f64 = 2.2;

/// Configuration for the Elo updater
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EloConfig {
    /// Rating every team starts from; also the regression target
    pub initial_rating: f64,
    /// Update factor
    pub k_factor: f64,
    /// Fraction of the distance to the mean removed at each week boundary
    pub regress_to_mean: f64,
    /// Rating points added to the home side when computing expectations
    pub home_field_advantage: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            initial_rating: 1500.0,
            k_factor: 25.0,
            regress_to_mean: 0.20,
            home_field_advantage: 2.1,
        }
    }
}

impl EloConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !self.initial_rating.is_finite() {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Elo initial rating must be finite".to_string(),
            }
            .into());
        }

        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Elo K factor must be positive".to_string(),
            }
            .into());
        }

        if !(0.0..=1.0).contains(&self.regress_to_mean) {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Elo regression to mean must be between 0 and 1".to_string(),
            }
            .into());
        }

        if !self.home_field_advantage.is_finite() {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "Elo home field advantage must be finite".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Actual home outcome: 1 for a win, 0 for a loss, 0.5 for a tie
pub fn game_outcome(home_points: i32, away_points: i32) -> f64 {
    match home_points.cmp(&away_points) {
        Ordering::Greater => 1.0,
        Ordering::Less => 0.0,
        Ordering::Equal => 0.5,
    }
}

/// Expected home win probability on the 400-point logistic scale
pub fn expected_home_win(home_rating: f64, away_rating: f64, home_field_advantage: f64) -> f64 {
    let (home, _away) = expected_score(
        &EloRating {
            rating: home_rating + home_field_advantage,
        },
        &EloRating {
            rating: away_rating,
        },
    );
    home
}

/// Grows with ln(margin + 1) and shrinks as the home side's rating edge grows
pub fn margin_multiplier(margin: i32, home_rating_edge: f64) -> f64 {
    let margin = f64::from(margin.abs().max(1));
    (margin + 1.0).ln()
        * (MARGIN_DISCOUNT_SCALE / (home_rating_edge * 0.001 + MARGIN_DISCOUNT_SCALE))
}

/// Replay the season and return every team's final Elo rating
pub fn run_elo(teams: &[TeamName], games: &[Game], config: &EloConfig) -> RatingMap {
    let mut ratings = vec![config.initial_rating; teams.len()];
    let index = team_index(teams);

    let mut ordered: Vec<ScoredGame<'_>> = scored_games(&index, games).collect();
    ordered.sort_by_key(|g| g.game.chronological_key());

    let mut week_marker: Option<u32> = None;
    let mut regressions = 0usize;
    for game in &ordered {
        let week = game.game.week;
        match week_marker {
            None => week_marker = Some(week),
            Some(marker) if marker != week => {
                regress(&mut ratings, config);
                regressions += 1;
                week_marker = Some(week);
            }
            Some(_) => {}
        }

        let home_rating = ratings[game.home];
        let away_rating = ratings[game.away];
        let expected = expected_home_win(home_rating, away_rating, config.home_field_advantage);
        let actual = game_outcome(game.home_points, game.away_points);
        let edge = home_rating + config.home_field_advantage - away_rating;
        let delta = config.k_factor * margin_multiplier(game.margin(), edge) * (actual - expected);

        ratings[game.home] += delta;
        ratings[game.away] -= delta;
    }

    debug!(
        "Elo replayed {} games for {} teams with {} weekly regressions",
        ordered.len(),
        teams.len(),
        regressions
    );
    to_rating_map(teams, &ratings)
}

fn regress(ratings: &mut [f64], config: &EloConfig) {
    let fraction = config.regress_to_mean;
    for rating in ratings.iter_mut() {
        *rating = *rating * (1.0 - fraction) + config.initial_rating * fraction;
    }
}

/// Elo rating model
#[derive(Debug, Clone)]
pub struct EloModel {
    config: EloConfig,
}

impl EloModel {
    /// Create a new Elo model
    pub fn new(config: EloConfig) -> crate::error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }
}

impl RatingModel for EloModel {
    fn method(&self) -> RatingMethod {
        RatingMethod::Elo
    }

    fn rate(&self, teams: &[TeamName], games: &[Game]) -> RatingMap {
        run_elo(teams, games, &self.config)
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }
}
