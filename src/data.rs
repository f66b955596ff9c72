//! Loading season data from local JSON files
//!
//! Team listings and game lists are read as written by the cache layer,
//! either as a bare array or wrapped in a `{"_cached_at", "data"}` envelope.

use crate::error::RatingsError;
use crate::types::{Game, GamesPayload, TeamInfo};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize)]
#[serde(untagged)]
enum TeamsPayload {
    Cached { data: Vec<TeamInfo> },
    Bare(Vec<TeamInfo>),
}

fn read(path: &Path) -> crate::error::Result<String> {
    fs::read_to_string(path).map_err(|e| {
        RatingsError::DataLoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Load the team listing at `path`
pub fn load_teams(path: &Path) -> crate::error::Result<Vec<TeamInfo>> {
    let raw = read(path)?;
    let payload: TeamsPayload =
        serde_json::from_str(&raw).map_err(|e| RatingsError::DataLoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let teams = match payload {
        TeamsPayload::Cached { data } => data,
        TeamsPayload::Bare(teams) => teams,
    };
    info!("Loaded {} teams from {}", teams.len(), path.display());
    Ok(teams)
}

/// Load the game list at `path`
pub fn load_games(path: &Path) -> crate::error::Result<GamesPayload> {
    let raw = read(path)?;
    let payload: GamesPayload =
        serde_json::from_str(&raw).map_err(|e| RatingsError::DataLoadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    if let Some(cached_at) = payload.cached_at() {
        debug!("Games payload {} cached at {}", path.display(), cached_at);
    }
    Ok(payload)
}

/// Games of a single season
pub fn season_games(games: &[Game], season: i32) -> Vec<Game> {
    games.iter().filter(|g| g.season == season).cloned().collect()
}
