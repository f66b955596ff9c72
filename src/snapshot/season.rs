//! Rebuilding a season's weekly snapshots from its games

use crate::config::RatingConfig;
use crate::rating::build_model;
use crate::types::{Game, RatingMap, RatingMethod, TeamName};
use std::collections::BTreeMap;
use tracing::debug;

/// Last week with a completed game, 0 when nothing has been played
pub fn max_completed_week(games: &[Game]) -> u32 {
    games
        .iter()
        .filter(|g| g.completed)
        .map(|g| g.week)
        .max()
        .unwrap_or(0)
}

/// Ratings as of the end of every week from 1 through the last completed week
///
/// Week `w` is rated from the completed games with `week <= w`. Pass the
/// games of a single season.
pub fn build_weekly_snapshots(
    method: RatingMethod,
    config: &RatingConfig,
    teams: &[TeamName],
    games: &[Game],
) -> crate::error::Result<BTreeMap<u32, RatingMap>> {
    let model = build_model(method, config)?;
    let max_week = max_completed_week(games);
    if max_week == 0 {
        debug!("No completed games, skipping {} snapshots", method);
        return Ok(BTreeMap::new());
    }

    let snapshots = (1..=max_week)
        .map(|week| {
            let played: Vec<Game> = games
                .iter()
                .filter(|g| g.completed && g.week <= week)
                .cloned()
                .collect();
            (week, model.rate(teams, &played))
        })
        .collect();

    Ok(snapshots)
}
