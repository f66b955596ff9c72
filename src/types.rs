//! Common types used throughout the ratings engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Unique identifier for teams (the school name)
pub type TeamName = String;

/// Team name to scalar rating. Keys are exactly the input team list.
pub type RatingMap = HashMap<TeamName, f64>;

/// Team name to conference name
pub type ConferenceMap = HashMap<TeamName, String>;

/// Conference name to strength scalar in the output band
pub type ConferenceStrengthMap = HashMap<String, f64>;

/// One scheduled or completed contest, in the upstream feed's camelCase shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub season: i32,
    #[serde(default)]
    pub week: u32,
    pub home_team: TeamName,
    pub away_team: TeamName,
    #[serde(default)]
    pub home_points: Option<i32>,
    #[serde(default)]
    pub away_points: Option<i32>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub home_conference: Option<String>,
    #[serde(default)]
    pub away_conference: Option<String>,
}

impl Game {
    /// Create a completed game with a final score
    pub fn final_score(
        season: i32,
        week: u32,
        home_team: &str,
        home_points: i32,
        away_team: &str,
        away_points: i32,
    ) -> Self {
        Self {
            id: None,
            season,
            week,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_points: Some(home_points),
            away_points: Some(away_points),
            completed: true,
            home_conference: None,
            away_conference: None,
        }
    }

    /// Create a game that has not been played yet
    pub fn scheduled(season: i32, week: u32, home_team: &str, away_team: &str) -> Self {
        Self {
            id: None,
            season,
            week,
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            home_points: None,
            away_points: None,
            completed: false,
            home_conference: None,
            away_conference: None,
        }
    }

    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_conferences(mut self, home: &str, away: &str) -> Self {
        self.home_conference = Some(home.to_string());
        self.away_conference = Some(away.to_string());
        self
    }

    /// `(home_points, away_points)` when the game is completed and both totals are present
    pub fn result(&self) -> Option<(i32, i32)> {
        if !self.completed {
            return None;
        }
        Some((self.home_points?, self.away_points?))
    }

    /// Ordering key for chronological passes
    pub fn chronological_key(&self) -> (i32, u32, u64) {
        (self.season, self.week, self.id.unwrap_or(0))
    }
}

/// Games as delivered by the cache layer: either a bare array or an envelope
/// carrying the time the payload was cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GamesPayload {
    Cached {
        #[serde(
            rename = "_cached_at",
            default,
            with = "chrono::serde::ts_seconds_option"
        )]
        cached_at: Option<DateTime<Utc>>,
        data: Vec<Game>,
    },
    Bare(Vec<Game>),
}

impl GamesPayload {
    /// When the payload was cached, if the envelope recorded it
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        match self {
            GamesPayload::Cached { cached_at, .. } => *cached_at,
            GamesPayload::Bare(_) => None,
        }
    }

    pub fn into_games(self) -> Vec<Game> {
        match self {
            GamesPayload::Cached { data, .. } => data,
            GamesPayload::Bare(games) => games,
        }
    }
}

/// Team entry from the upstream team listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub school: TeamName,
    #[serde(default)]
    pub conference: Option<String>,
}

/// Team names in listing order
pub fn team_list(teams: &[TeamInfo]) -> Vec<TeamName> {
    teams.iter().map(|t| t.school.clone()).collect()
}

/// Conference affiliation for every team that lists one
pub fn conference_map(teams: &[TeamInfo]) -> ConferenceMap {
    teams
        .iter()
        .filter_map(|t| t.conference.as_ref().map(|c| (t.school.clone(), c.clone())))
        .collect()
}

/// Win/loss tally for one team
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl From<Record> for (u32, u32) {
    fn from(record: Record) -> Self {
        (record.wins, record.losses)
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

/// Which rating model produced a rating mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingMethod {
    Colley,
    Massey,
    Elo,
    Hybrid,
}

impl RatingMethod {
    pub const ALL: [RatingMethod; 4] = [
        RatingMethod::Colley,
        RatingMethod::Massey,
        RatingMethod::Elo,
        RatingMethod::Hybrid,
    ];

    /// Name used in snapshot keys and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            RatingMethod::Colley => "colley",
            RatingMethod::Massey => "massey",
            RatingMethod::Elo => "elo",
            RatingMethod::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for RatingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingMethod {
    type Err = crate::error::RatingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "colley" => Ok(RatingMethod::Colley),
            "massey" => Ok(RatingMethod::Massey),
            "elo" => Ok(RatingMethod::Elo),
            "hybrid" => Ok(RatingMethod::Hybrid),
            other => Err(crate::error::RatingsError::InvalidInput {
                reason: format!("Unknown rating method: {}", other),
            }),
        }
    }
}
