//! Utility functions shared by the rating models and analytics

use crate::types::{Game, RatingMap, TeamName};
use std::collections::HashMap;

/// A completed game between two tracked teams, resolved to team indices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredGame<'a> {
    pub game: &'a Game,
    pub home: usize,
    pub away: usize,
    pub home_points: i32,
    pub away_points: i32,
}

impl ScoredGame<'_> {
    /// Home points minus away points
    pub fn margin(&self) -> i32 {
        self.home_points - self.away_points
    }
}

/// Map each team name to its position in the team list
pub fn team_index(teams: &[TeamName]) -> HashMap<&str, usize> {
    teams
        .iter()
        .enumerate()
        .map(|(i, team)| (team.as_str(), i))
        .collect()
}

/// Games that count toward ratings: completed, both scores present, and both
/// teams in the tracked list. Everything else is skipped silently.
pub fn scored_games<'a>(
    index: &'a HashMap<&'a str, usize>,
    games: &'a [Game],
) -> impl Iterator<Item = ScoredGame<'a>> + 'a {
    games.iter().filter_map(move |game| {
        let (home_points, away_points) = game.result()?;
        let home = *index.get(game.home_team.as_str())?;
        let away = *index.get(game.away_team.as_str())?;
        Some(ScoredGame {
            game,
            home,
            away,
            home_points,
            away_points,
        })
    })
}

/// Zip a rating vector back onto the team list
pub fn to_rating_map(teams: &[TeamName], values: &[f64]) -> RatingMap {
    teams
        .iter()
        .cloned()
        .zip(values.iter().copied())
        .collect()
}

/// Teams ordered best first. Ties are broken by team name so the order is stable.
pub fn rank_order(ratings: &RatingMap) -> Vec<(TeamName, f64)> {
    let mut ordered: Vec<(TeamName, f64)> = ratings
        .iter()
        .map(|(team, rating)| (team.clone(), *rating))
        .collect();
    ordered.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ordered
}

/// 1-based rank of every team in the mapping
pub fn rank_map(ratings: &RatingMap) -> HashMap<TeamName, usize> {
    rank_order(ratings)
        .into_iter()
        .enumerate()
        .map(|(i, (team, _))| (team, i + 1))
        .collect()
}

/// Arithmetic mean, 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of an ascending-sorted slice; even lengths average the two middle values
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}
