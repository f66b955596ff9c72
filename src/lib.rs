//! CFB Ratings - College football rating and analytics engine
//!
//! This crate rates teams from a season of game results with the Colley,
//! Massey, Elo and hybrid models, and derives records, strength of schedule,
//! momentum, conference strength and power points from those ratings.

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod rating;
pub mod snapshot;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingsError, Result};
pub use types::*;

// Re-export key components
pub use rating::{build_model, compute_ratings, RatingModel};
pub use snapshot::{JsonSnapshotStore, NoSnapshots, SnapshotLookup};
pub use utils::rank_order;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
