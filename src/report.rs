//! Batch summary reporting.

use crate::types::transaction::ScoredTransaction;
use serde::Serialize;
use tracing::{info, warn};

/// Minimum fraud score counted as high risk.
pub const HIGH_RISK_SCORE: u8 = 2;

/// Aggregate counts for one batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Records that survived cleaning
    pub total_records: usize,
    /// Records whose source label marked them as fraud
    pub original_fraud_flags: usize,
    /// Records flagged by at least one rule
    pub rule_based_flags: usize,
    /// Records with fraud_score >= HIGH_RISK_SCORE
    pub high_risk_transactions: usize,
}

/// Compute the summary for a scored batch. Pure; empty input yields all
/// zero counts.
pub fn summarize(transactions: &[ScoredTransaction]) -> Summary {
    Summary {
        total_records: transactions.len(),
        original_fraud_flags: transactions.iter().filter(|tx| tx.is_fraud).count(),
        rule_based_flags: transactions
            .iter()
            .filter(|tx| tx.rule_based_fraud_flag)
            .count(),
        high_risk_transactions: transactions
            .iter()
            .filter(|tx| tx.fraud_score >= HIGH_RISK_SCORE)
            .count(),
    }
}

/// Emit the summary as a single structured log line.
pub fn log_summary(summary: &Summary) {
    match serde_json::to_string(summary) {
        Ok(json) => info!(summary = %json, "Batch summary"),
        Err(err) => warn!(error = %err, "Failed to serialize batch summary"),
    }
}
