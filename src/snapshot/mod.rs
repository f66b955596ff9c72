//! Weekly rating snapshots
//!
//! A snapshot is a rating mapping frozen at a given week. The analytics layer
//! only reads snapshots through [`SnapshotLookup`]; a missing snapshot is
//! `None`, never an error.

pub mod season;
pub mod store;

use crate::types::{RatingMap, RatingMethod};
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use season::build_weekly_snapshots;
pub use store::{InMemorySnapshotStore, JsonSnapshotStore};

/// Identifies one weekly snapshot
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotKey {
    pub season: i32,
    pub week: u32,
    pub method: RatingMethod,
}

impl SnapshotKey {
    pub fn new(season: i32, week: u32, method: RatingMethod) -> Self {
        Self {
            season,
            week,
            method,
        }
    }
}

impl std::fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} week {}", self.season, self.method, self.week)
    }
}

/// Read-only access to weekly snapshots
///
/// Implementations must be safe for concurrent reads.
#[cfg_attr(test, mockall::automock)]
pub trait SnapshotLookup: Send + Sync {
    /// Ratings frozen at `week` of `season` for `method`, if one was recorded
    fn weekly_ratings(&self, season: i32, week: u32, method: RatingMethod) -> Option<RatingMap>;
}

/// Lookup with no snapshots; every week falls back to the current ratings
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnapshots;

impl SnapshotLookup for NoSnapshots {
    fn weekly_ratings(&self, _season: i32, _week: u32, _method: RatingMethod) -> Option<RatingMap> {
        None
    }
}

impl<F> SnapshotLookup for F
where
    F: Fn(i32, u32, RatingMethod) -> Option<RatingMap> + Send + Sync,
{
    fn weekly_ratings(&self, season: i32, week: u32, method: RatingMethod) -> Option<RatingMap> {
        self(season, week, method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_snapshots_is_always_missing() {
        assert!(NoSnapshots
            .weekly_ratings(2024, 1, RatingMethod::Hybrid)
            .is_none());
    }

    #[test]
    fn test_closure_lookup() {
        let lookup = |season: i32, week: u32, method: RatingMethod| {
            (season == 2024 && week == 3 && method == RatingMethod::Elo)
                .then(|| RatingMap::from([("A".to_string(), 1.0)]))
        };
        assert!(lookup.weekly_ratings(2024, 3, RatingMethod::Elo).is_some());
        assert!(lookup.weekly_ratings(2024, 4, RatingMethod::Elo).is_none());
    }

    #[test]
    fn test_snapshot_key_display() {
        let key = SnapshotKey::new(2024, 5, RatingMethod::Massey);
        assert_eq!(key.to_string(), "2024 massey week 5");
    }
}
