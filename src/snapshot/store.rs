//! Snapshot store implementations
//!
//! `InMemorySnapshotStore` keeps snapshots behind a lock for tests and
//! embedding. `JsonSnapshotStore` reads and writes one JSON file per snapshot
//! in a cache directory, named `ratings_{season}_{method}_week{week}.json`.

use crate::config::RatingConfig;
use crate::error::RatingsError;
use crate::snapshot::season::build_weekly_snapshots;
use crate::snapshot::{SnapshotKey, SnapshotLookup};
use crate::types::{Game, RatingMap, RatingMethod, TeamName};
use anyhow::Context;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// In-memory snapshot store
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshots: RwLock<HashMap<SnapshotKey, RatingMap>>,
}

impl InMemorySnapshotStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store from a season of weekly snapshots
    pub fn from_season(
        season: i32,
        method: RatingMethod,
        weekly: BTreeMap<u32, RatingMap>,
    ) -> Self {
        let snapshots = weekly
            .into_iter()
            .map(|(week, ratings)| (SnapshotKey::new(season, week, method), ratings))
            .collect();
        Self {
            snapshots: RwLock::new(snapshots),
        }
    }

    /// Store or replace a snapshot
    pub fn insert(&self, key: SnapshotKey, ratings: RatingMap) -> crate::error::Result<()> {
        let mut snapshots =
            self.snapshots
                .write()
                .map_err(|_| RatingsError::SnapshotStoreFailed {
                    message: "Failed to acquire snapshots write lock".to_string(),
                })?;

        snapshots.insert(key, ratings);
        Ok(())
    }

    /// Number of stored snapshots
    pub fn len(&self) -> usize {
        self.snapshots.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SnapshotLookup for InMemorySnapshotStore {
    fn weekly_ratings(&self, season: i32, week: u32, method: RatingMethod) -> Option<RatingMap> {
        let snapshots = self.snapshots.read().ok()?;
        snapshots
            .get(&SnapshotKey::new(season, week, method))
            .cloned()
    }
}

/// Snapshot store backed by JSON files in a cache directory
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    dir: PathBuf,
}

impl JsonSnapshotStore {
    /// Create a store rooted at `dir`; the directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the snapshot for `key`
    pub fn path_for(&self, key: &SnapshotKey) -> PathBuf {
        self.dir.join(format!(
            "ratings_{}_{}_week{}.json",
            key.season, key.method, key.week
        ))
    }

    pub fn contains(&self, key: &SnapshotKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Write a snapshot, replacing any existing file atomically
    pub fn save(&self, key: &SnapshotKey, ratings: &RatingMap) -> crate::error::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create snapshot dir {}", self.dir.display()))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(ratings).context("serialize snapshot")?;
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("swap {}", path.display()))?;

        debug!("Saved snapshot {} to {}", key, path.display());
        Ok(())
    }

    /// Compute and save every weekly snapshot of `season` that is not cached yet
    ///
    /// Returns the number of snapshots written.
    pub fn ensure_season(
        &self,
        season: i32,
        method: RatingMethod,
        config: &RatingConfig,
        teams: &[TeamName],
        games: &[Game],
    ) -> crate::error::Result<usize> {
        let season_games: Vec<Game> = games
            .iter()
            .filter(|g| g.season == season)
            .cloned()
            .collect();

        let mut written = 0;
        for (week, ratings) in build_weekly_snapshots(method, config, teams, &season_games)? {
            let key = SnapshotKey::new(season, week, method);
            if self.contains(&key) {
                continue;
            }
            self.save(&key, &ratings)?;
            written += 1;
        }

        info!(
            "Wrote {} {} snapshots for {} to {}",
            written,
            method,
            season,
            self.dir.display()
        );
        Ok(written)
    }
}

impl SnapshotLookup for JsonSnapshotStore {
    fn weekly_ratings(&self, season: i32, week: u32, method: RatingMethod) -> Option<RatingMap> {
        let path = self.path_for(&SnapshotKey::new(season, week, method));
        if !path.is_file() {
            return None;
        }

        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read snapshot {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<RatingMap>(&raw) {
            Ok(ratings) => Some(ratings),
            Err(e) => {
                warn!("Ignoring malformed snapshot {}: {}", path.display(), e);
                None
            }
        }
    }
}
