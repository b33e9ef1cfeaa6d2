//! Type definitions for the fraud data pipeline

pub mod transaction;

pub use transaction::{RawTransaction, ScoredTransaction, Transaction};
