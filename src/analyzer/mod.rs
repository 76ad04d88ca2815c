//! Analyzer module - content scoring engine

pub mod alignment;
pub mod engine;
pub mod rules;
pub mod scoring;
pub mod text;

pub use engine::AeoScorer;
pub use scoring::ScoreCalculator;
