//! Configuration management for the ratings engine
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values for every rating model.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, AppConfig, DataSettings, ServiceSettings};
pub use rating::RatingConfig;
