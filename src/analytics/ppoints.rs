//! Predictive power points
//!
//! For every completed game each side earns tier points for the opponent it
//! faced. The opponent's tier is read twice: from the weekly snapshot in
//! effect at game time and from the current ratings, then blended by
//! `weight_current`. Away wins are worth more, and the opponent's blended
//! conference strength scales the result. Winners gain scaled points; losers
//! lose `loss_penalty_factor / max(tier points, 1)`.

use crate::analytics::conference::{conference_strength, ConferenceStrengthConfig};
use crate::snapshot::SnapshotLookup;
use crate::types::{ConferenceMap, ConferenceStrengthMap, Game, RatingMap, RatingMethod, TeamName};
use crate::utils::rank_map;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Rank used for teams missing from a rating mapping
pub const UNRANKED: usize = 1000;

/// Strength used for a conference missing from the strength mapping
pub const NEUTRAL_CONFERENCE_STRENGTH: f64 = 1.0;

/// Points for beating a team ranked at or above `max_rank`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub max_rank: usize,
    pub points: f64,
}

/// Configuration for power points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PPointsConfig {
    /// Weight of the current ratings against the game-time snapshot
    pub weight_current: f64,
    /// Tiers in ascending `max_rank` order
    pub tiers: Vec<Tier>,
    /// Points for an opponent ranked below every tier
    pub base_tier_points: f64,
    pub home_multiplier: f64,
    pub away_multiplier: f64,
    pub loss_penalty_factor: f64,
    pub extra_win_factor: f64,
    /// Replaces `loss_penalty_factor` when the conferences differ
    pub cross_conference_loss_penalty: f64,
    /// Replaces `extra_win_factor` when the conferences differ
    pub cross_conference_win_factor: f64,
    pub conference: ConferenceStrengthConfig,
}

impl Default for PPointsConfig {
    fn default() -> Self {
        Self {
            weight_current: 0.5,
            tiers: vec![
                Tier {
                    max_rank: 10,
                    points: 8.0,
                },
                Tier {
                    max_rank: 25,
                    points: 5.0,
                },
                Tier {
                    max_rank: 40,
                    points: 3.0,
                },
                Tier {
                    max_rank: 60,
                    points: 2.0,
                },
            ],
            base_tier_points: 1.0,
            home_multiplier: 1.00,
            away_multiplier: 1.20,
            loss_penalty_factor: 4.0,
            extra_win_factor: 1.0,
            cross_conference_loss_penalty: 2.0,
            cross_conference_win_factor: 1.5,
            conference: ConferenceStrengthConfig::default(),
        }
    }
}

impl PPointsConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(0.0..=1.0).contains(&self.weight_current) {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "PPoints weight_current must be between 0 and 1".to_string(),
            }
            .into());
        }

        if self
            .tiers
            .windows(2)
            .any(|pair| pair[0].max_rank >= pair[1].max_rank)
        {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "PPoints tiers must be in ascending rank order".to_string(),
            }
            .into());
        }

        let factors = [
            self.base_tier_points,
            self.home_multiplier,
            self.away_multiplier,
            self.loss_penalty_factor,
            self.extra_win_factor,
            self.cross_conference_loss_penalty,
            self.cross_conference_win_factor,
        ];
        if factors.iter().any(|f| !f.is_finite()) {
            return Err(crate::error::RatingsError::ConfigurationError {
                message: "PPoints factors must be finite".to_string(),
            }
            .into());
        }

        self.conference.validate()
    }

    /// Tier points for beating a team at `rank`
    pub fn tier_points(&self, rank: usize) -> f64 {
        self.tiers
            .iter()
            .find(|tier| rank <= tier.max_rank)
            .map(|tier| tier.points)
            .unwrap_or(self.base_tier_points)
    }

    /// `(loss penalty, win factor)` for a game between these conferences
    pub fn game_factors(&self, home: Option<&str>, away: Option<&str>) -> (f64, f64) {
        match (home, away) {
            (Some(h), Some(a)) if h != a => (
                self.cross_conference_loss_penalty,
                self.cross_conference_win_factor,
            ),
            _ => (self.loss_penalty_factor, self.extra_win_factor),
        }
    }

    /// `(1 - weight_current) * at_game_time + weight_current * current`
    pub fn blend(&self, at_game_time: f64, current: f64) -> f64 {
        (1.0 - self.weight_current) * at_game_time + self.weight_current * current
    }
}

/// Ranks and conference strengths derived from one rating mapping
#[derive(Debug, Clone)]
struct RatingView {
    ranks: HashMap<TeamName, usize>,
    conference_strength: ConferenceStrengthMap,
}

impl RatingView {
    fn new(ratings: &RatingMap, conference_map: &ConferenceMap, config: &PPointsConfig) -> Self {
        Self {
            ranks: rank_map(ratings),
            conference_strength: conference_strength(ratings, conference_map, &config.conference),
        }
    }

    fn rank(&self, team: &str) -> usize {
        self.ranks.get(team).copied().unwrap_or(UNRANKED)
    }

    fn strength(&self, conference: Option<&str>) -> f64 {
        conference
            .and_then(|c| self.conference_strength.get(c).copied())
            .unwrap_or(NEUTRAL_CONFERENCE_STRENGTH)
    }
}

/// Power points of every team
///
/// # Arguments
/// * `teams` - Tracked teams; games involving anyone else are skipped
/// * `games` - Season games; only completed games with both scores count
/// * `ratings` - Current (final) ratings of `method`
/// * `conference_map` - Team affiliations used to compute conference strength
/// * `snapshots` - Weekly snapshot lookup; a missing week uses `ratings`
/// * `method` - Snapshot method to read
pub fn ppoints(
    teams: &[TeamName],
    games: &[Game],
    ratings: &RatingMap,
    conference_map: &ConferenceMap,
    snapshots: &dyn SnapshotLookup,
    method: RatingMethod,
    config: &PPointsConfig,
) -> HashMap<TeamName, f64> {
    let mut scores: HashMap<TeamName, f64> = teams.iter().map(|t| (t.clone(), 0.0)).collect();

    let current = RatingView::new(ratings, conference_map, config);
    let mut weekly: HashMap<(i32, u32), RatingView> = HashMap::new();

    for game in games {
        let Some((home_points, away_points)) = game.result() else {
            continue;
        };
        if !scores.contains_key(&game.home_team) || !scores.contains_key(&game.away_team) {
            continue;
        }

        let at_game_time = weekly.entry((game.season, game.week)).or_insert_with(|| {
            match snapshots.weekly_ratings(game.season, game.week, method) {
                Some(snapshot) => RatingView::new(&snapshot, conference_map, config),
                None => {
                    debug!(
                        "No {} snapshot for {} week {}, using current ratings",
                        method, game.season, game.week
                    );
                    current.clone()
                }
            }
        });

        // Points each side earns for the opponent it faced
        let opp_points_home = config.blend(
            config.tier_points(at_game_time.rank(&game.away_team)),
            config.tier_points(current.rank(&game.away_team)),
        );
        let opp_points_away = config.blend(
            config.tier_points(at_game_time.rank(&game.home_team)),
            config.tier_points(current.rank(&game.home_team)),
        );

        let home_conf = game.home_conference.as_deref();
        let away_conf = game.away_conference.as_deref();
        let home_strength = config.blend(
            at_game_time.strength(home_conf),
            current.strength(home_conf),
        );
        let away_strength = config.blend(
            at_game_time.strength(away_conf),
            current.strength(away_conf),
        );

        let base_home = opp_points_home * config.home_multiplier * away_strength;
        let base_away = opp_points_away * config.away_multiplier * home_strength;
        let (loss_penalty, win_factor) = config.game_factors(home_conf, away_conf);

        match home_points.cmp(&away_points) {
            Ordering::Greater => {
                add(&mut scores, &game.home_team, win_factor * base_home);
                add(
                    &mut scores,
                    &game.away_team,
                    -loss_penalty / opp_points_home.max(1.0),
                );
            }
            Ordering::Less => {
                add(&mut scores, &game.away_team, win_factor * base_away);
                add(
                    &mut scores,
                    &game.home_team,
                    -loss_penalty / opp_points_away.max(1.0),
                );
            }
            Ordering::Equal => {}
        }
    }

    scores
}

fn add(scores: &mut HashMap<TeamName, f64>, team: &str, delta: f64) {
    if let Some(score) = scores.get_mut(team) {
        *score += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{MockSnapshotLookup, NoSnapshots};
    use mockall::predicate::eq;

    fn teams(names: &[&str]) -> Vec<TeamName> {
        names.iter().map(|s| s.to_string()).collect()
    }

    /// Ratings where the first name is ranked 1, the second 2, and so on
    fn ranked(names: &[&str]) -> RatingMap {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), 100.0 - i as f64))
            .collect()
    }

    #[test]
    fn test_tier_points_table() {
        let config = PPointsConfig::default();
        assert_eq!(config.tier_points(1), 8.0);
        assert_eq!(config.tier_points(10), 8.0);
        assert_eq!(config.tier_points(11), 5.0);
        assert_eq!(config.tier_points(25), 5.0);
        assert_eq!(config.tier_points(40), 3.0);
        assert_eq!(config.tier_points(60), 2.0);
        assert_eq!(config.tier_points(61), 1.0);
        assert_eq!(config.tier_points(UNRANKED), 1.0);
    }

    #[test]
    fn test_config_validation() {
        assert!(PPointsConfig::default().validate().is_ok());

        let mut config = PPointsConfig::default();
        config.weight_current = 1.2;
        assert!(config.validate().is_err());

        config = PPointsConfig::default();
        config.tiers.swap(0, 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_game_factors_switch_only_across_conferences() {
        let config = PPointsConfig::default();
        assert_eq!(config.game_factors(Some("SEC"), Some("SEC")), (4.0, 1.0));
        assert_eq!(config.game_factors(Some("SEC"), Some("ACC")), (2.0, 1.5));
        assert_eq!(config.game_factors(None, Some("ACC")), (4.0, 1.0));
        assert_eq!(config.game_factors(None, None), (4.0, 1.0));
    }

    #[test]
    fn test_home_win_without_conferences() {
        let teams = teams(&["A", "B"]);
        let ratings = ranked(&["A", "B"]);
        let games = vec![Game::final_score(2024, 1, "A", 28, "B", 21)];
        let scores = ppoints(
            &teams,
            &games,
            &ratings,
            &ConferenceMap::new(),
            &NoSnapshots,
            RatingMethod::Hybrid,
            &PPointsConfig::default(),
        );

        // B is ranked 2nd: 8 tier points, home multiplier 1.0, neutral strength
        assert!((scores["A"] - 8.0).abs() < 1e-12);
        assert!((scores["B"] + 4.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_away_win_uses_away_multiplier() {
        let teams = teams(&["A", "B"]);
        let ratings = ranked(&["A", "B"]);
        let games = vec![Game::final_score(2024, 1, "A", 10, "B", 13)];
        let scores = ppoints(
            &teams,
            &games,
            &ratings,
            &ConferenceMap::new(),
            &NoSnapshots,
            RatingMethod::Hybrid,
            &PPointsConfig::default(),
        );
        assert!((scores["B"] - 8.0 * 1.2).abs() < 1e-12);
        assert!((scores["A"] + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ties_and_untracked_teams_score_nothing() {
        let teams = teams(&["A", "B"]);
        let ratings = ranked(&["A", "B"]);
        let games = vec![
            Game::final_score(2024, 1, "A", 17, "B", 17),
            Game::final_score(2024, 2, "A", 63, "FCS Team", 0),
            Game::scheduled(2024, 3, "B", "A"),
        ];
        let scores = ppoints(
            &teams,
            &games,
            &ratings,
            &ConferenceMap::new(),
            &NoSnapshots,
            RatingMethod::Elo,
            &PPointsConfig::default(),
        );
        assert_eq!(scores["A"], 0.0);
        assert_eq!(scores["B"], 0.0);
    }

    #[test]
    fn test_snapshot_rank_blends_with_current_rank() {
        // 30 teams: "T0" is ranked first now but was ranked 30th in week 1
        let names: Vec<String> = (0..30).map(|i| format!("T{}", i)).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let ratings = ranked(&name_refs);
        let mut week_one = ratings.clone();
        week_one.insert("T0".to_string(), -1.0);

        let mut lookup = MockSnapshotLookup::new();
        lookup
            .expect_weekly_ratings()
            .with(eq(2024), eq(1), eq(RatingMethod::Hybrid))
            .times(1)
            .return_const(Some(week_one));

        let games = vec![
            Game::final_score(2024, 1, "T1", 21, "T0", 20),
            Game::final_score(2024, 1, "T2", 3, "T3", 0),
        ];
        let scores = ppoints(
            &names,
            &games,
            &ratings,
            &ConferenceMap::new(),
            &lookup,
            RatingMethod::Hybrid,
            &PPointsConfig::default(),
        );

        // T0 at game time: rank 30 -> 3 points; now: rank 1 -> 8 points
        let blended = 0.5 * 3.0 + 0.5 * 8.0;
        assert!((scores["T1"] - blended).abs() < 1e-12);
        assert!((scores["T0"] + 4.0 / blended).abs() < 1e-12);
    }

    #[test]
    fn test_cross_conference_win_scaled_by_opponent_conference() {
        let teams = teams(&["A", "B", "C", "D"]);
        let ratings = ranked(&["A", "B", "C", "D"]);
        let conferences = ConferenceMap::from([
            ("A".to_string(), "East".to_string()),
            ("B".to_string(), "East".to_string()),
            ("C".to_string(), "West".to_string()),
            ("D".to_string(), "West".to_string()),
        ]);
        // East is the stronger conference -> 1.6, West -> 0.6
        let games = vec![
            Game::final_score(2024, 1, "D", 24, "A", 10).with_conferences("West", "East"),
        ];
        let scores = ppoints(
            &teams,
            &games,
            &ratings,
            &conferences,
            &NoSnapshots,
            RatingMethod::Massey,
            &PPointsConfig::default(),
        );

        // D beat a top-10 team from a 1.6 conference at home, cross-conference win factor 1.5
        assert!((scores["D"] - 1.5 * 8.0 * 1.0 * 1.6).abs() < 1e-12);
        // A lost: cross-conference penalty 2.0 over A's own tier points
        assert!((scores["A"] + 2.0 / 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_each_week_is_looked_up_once() {
        let teams = teams(&["A", "B", "C"]);
        let ratings = ranked(&["A", "B", "C"]);

        let mut lookup = MockSnapshotLookup::new();
        lookup
            .expect_weekly_ratings()
            .with(eq(2024), eq(1), eq(RatingMethod::Colley))
            .times(1)
            .return_const(None);
        lookup
            .expect_weekly_ratings()
            .with(eq(2024), eq(2), eq(RatingMethod::Colley))
            .times(1)
            .return_const(None);

        let games = vec![
            Game::final_score(2024, 1, "A", 21, "B", 3),
            Game::final_score(2024, 1, "C", 14, "B", 7),
            Game::final_score(2024, 2, "A", 30, "C", 0),
        ];
        let scores = ppoints(
            &teams,
            &games,
            &ratings,
            &ConferenceMap::new(),
            &lookup,
            RatingMethod::Colley,
            &PPointsConfig::default(),
        );
        assert!(scores["A"] > scores["C"]);
        assert!(scores["C"] > scores["B"]);
    }
}
