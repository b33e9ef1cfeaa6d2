//! Rule-based fraud detection.

pub mod engine;
pub mod velocity;

pub use engine::{RuleEngine, ScoreOutcome};
