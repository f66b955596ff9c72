//! Test fixtures and builders for integration testing

#![allow(dead_code)]

use cfb_ratings::types::{ConferenceMap, Game, TeamName};

/// Team names from a list of literals
pub fn teams(names: &[&str]) -> Vec<TeamName> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Deterministic round-robin style season
///
/// Team `i` is named `Team {i:03}` and sits in conference `Conf {i % conferences}`.
/// Every week each team plays its neighbour at an offset that rotates with the
/// week; the lower-indexed team wins by a margin driven by the index gap, so the
/// true order is `Team 000` strongest.
pub struct SyntheticSeason {
    pub season: i32,
    pub teams: Vec<TeamName>,
    pub conferences: ConferenceMap,
    pub games: Vec<Game>,
}

impl SyntheticSeason {
    pub fn new(team_count: usize, weeks: u32, conferences: usize) -> Self {
        let season = 2024;
        let teams: Vec<TeamName> = (0..team_count).map(|i| format!("Team {:03}", i)).collect();
        let conference_of = |i: usize| format!("Conf {}", i % conferences.max(1));
        let conference_map: ConferenceMap = teams
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), conference_of(i)))
            .collect();

        let mut games = Vec::new();
        let mut id = 1;
        for week in 1..=weeks {
            let offset = (week as usize % (team_count / 2).max(1)) + 1;
            for home in (0..team_count).step_by(2) {
                let away = (home + offset) % team_count;
                if away == home {
                    continue;
                }
                let gap = home.abs_diff(away) as i32;
                let (home_points, away_points) = if home < away {
                    (21 + gap.min(40), 14)
                } else {
                    (14, 21 + gap.min(40))
                };
                games.push(
                    Game::final_score(
                        season,
                        week,
                        &teams[home],
                        home_points,
                        &teams[away],
                        away_points,
                    )
                    .with_id(id)
                    .with_conferences(&conference_of(home), &conference_of(away)),
                );
                id += 1;
            }
        }

        Self {
            season,
            teams,
            conferences: conference_map,
            games,
        }
    }
}

/// The two-team season with one game: A (home) 28, B (away) 21
pub fn single_game() -> (Vec<TeamName>, Vec<Game>) {
    (
        teams(&["A", "B"]),
        vec![Game::final_score(2024, 1, "A", 28, "B", 21).with_id(1)],
    )
}

/// Three teams where C has not played
pub fn isolated_team() -> (Vec<TeamName>, Vec<Game>) {
    (
        teams(&["A", "B", "C"]),
        vec![
            Game::final_score(2024, 1, "A", 28, "B", 21).with_id(1),
            Game::final_score(2024, 2, "B", 35, "A", 31).with_id(2),
        ],
    )
}
