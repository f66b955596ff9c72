//! Season analytics built on top of a rating mapping
//!
//! Records, strength of schedule and momentum read the game list directly.
//! Conference strength and power points also read weekly snapshots.

pub mod conference;
pub mod ppoints;
pub mod schedule;

// Re-export commonly used types
pub use conference::{conference_strength, ConferenceStrengthConfig, CONFERENCE_BAND};
pub use ppoints::{ppoints, PPointsConfig, Tier};
pub use schedule::{momentum, records, strength_of_schedule, MOMENTUM_WINDOW};
