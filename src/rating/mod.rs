//! Team rating models
//!
//! This module provides the Colley, Massey, Elo and hybrid rating models,
//! the dense linear solver they share, and model selection by method.

pub mod calculator;
pub mod colley;
pub mod elo;
pub mod hybrid;
pub mod linalg;
pub mod massey;

// Re-export commonly used types
pub use calculator::{build_model, compute_ratings, RatingModel};
pub use colley::{build_colley, colley_ratings, solve_colley, ColleyConfig, ColleyModel};
pub use elo::{run_elo, EloConfig, EloModel};
pub use hybrid::{hybrid_ratings, HybridConfig, HybridModel};
pub use linalg::{LinearSystem, SolveOutcome};
pub use massey::{build_massey, massey_ratings, solve_massey, MasseyConfig, MasseyModel};
