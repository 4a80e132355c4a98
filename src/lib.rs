//! PropFirm Match - comparison and matching engine for prop firm challenges
//!
//! The `core` module holds the deterministic scoring logic: attribute
//! normalization, per-category winners, pairwise verdicts, the 2-4 way
//! comparator and the preference quiz. `routes` and `services` wrap it in an
//! HTTP service over a catalog loaded once at startup.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    Catalog, ComparatorSession, NwayOutcome, Outcome, PairRegistry, PairwiseComparison, QuizBank,
    QuizState, ScoringEngine,
};
pub use models::{Currency, Offering, QuizOption, QuizQuestion};
