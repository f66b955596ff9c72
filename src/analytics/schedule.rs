//! Records, strength of schedule and momentum
//!
//! All three read the same qualifying games as the rating models: completed,
//! both scores present, both teams tracked.

use crate::types::{Game, RatingMap, Record, TeamName};
use crate::utils::{mean, scored_games, team_index, ScoredGame};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Number of most recent games averaged into momentum
pub const MOMENTUM_WINDOW: usize = 3;

/// Win/loss record of every team
///
/// A tie credits both teams with a win and neither with a loss.
pub fn records(teams: &[TeamName], games: &[Game]) -> HashMap<TeamName, Record> {
    let index = team_index(teams);
    let mut tally = vec![Record::default(); teams.len()];

    for game in scored_games(&index, games) {
        match game.home_points.cmp(&game.away_points) {
            Ordering::Greater => {
                tally[game.home].wins += 1;
                tally[game.away].losses += 1;
            }
            Ordering::Less => {
                tally[game.away].wins += 1;
                tally[game.home].losses += 1;
            }
            Ordering::Equal => {
                tally[game.home].wins += 1;
                tally[game.away].wins += 1;
            }
        }
    }

    teams.iter().cloned().zip(tally).collect()
}

/// Mean rating of each team's opponents; 0.0 for teams without games
pub fn strength_of_schedule(
    teams: &[TeamName],
    games: &[Game],
    ratings: &RatingMap,
) -> HashMap<TeamName, f64> {
    let index = team_index(teams);
    let mut opponents: Vec<Vec<f64>> = vec![Vec::new(); teams.len()];
    let rating_of = |i: usize| ratings.get(&teams[i]).copied().unwrap_or(0.0);

    for game in scored_games(&index, games) {
        opponents[game.home].push(rating_of(game.away));
        opponents[game.away].push(rating_of(game.home));
    }

    teams
        .iter()
        .cloned()
        .zip(opponents.iter().map(|o| mean(o)))
        .collect()
}

/// Mean over each team's last three games of actual margin minus the margin
/// implied by the supplied ratings
pub fn momentum(teams: &[TeamName], games: &[Game], ratings: &RatingMap) -> HashMap<TeamName, f64> {
    let index = team_index(teams);
    let mut deviations: Vec<Vec<f64>> = vec![Vec::new(); teams.len()];
    let rating_of = |i: usize| ratings.get(&teams[i]).copied().unwrap_or(0.0);

    let mut ordered: Vec<ScoredGame<'_>> = scored_games(&index, games).collect();
    ordered.sort_by_key(|g| (g.game.season, g.game.week));

    for game in &ordered {
        let expected_margin = rating_of(game.home) - rating_of(game.away);
        let delta = f64::from(game.margin()) - expected_margin;
        deviations[game.home].push(delta);
        deviations[game.away].push(-delta);
    }

    teams
        .iter()
        .cloned()
        .zip(deviations.iter().map(|d| {
            let start = d.len().saturating_sub(MOMENTUM_WINDOW);
            mean(&d[start..])
        }))
        .collect()
}
