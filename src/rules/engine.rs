//! Rule engine: applies the fraud rules and assigns scores.

use crate::config::RulesConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::rules::velocity;
use crate::types::transaction::{ScoredTransaction, Transaction};
use chrono::Duration;
use tracing::info;

/// Scored batch plus per-rule trigger counts.
#[derive(Debug)]
pub struct ScoreOutcome {
    /// Scored transactions, in input order
    pub transactions: Vec<ScoredTransaction>,
    /// Transactions exceeding the amount threshold
    pub high_amount_triggers: usize,
    /// Transactions at a suspicious merchant
    pub merchant_triggers: usize,
    /// Transactions inside the velocity window
    pub velocity_triggers: usize,
    /// Transactions with at least one rule triggered
    pub flagged: usize,
}

/// Applies the three fraud rules to a batch of cleaned transactions.
///
/// Each rule contributes one point to the fraud score: amount above the
/// threshold, merchant name containing a suspicious keyword, and a gap to
/// the same user's previous transaction shorter than the velocity window.
pub struct RuleEngine {
    amount_threshold: f64,
    suspicious_merchants: Vec<String>,
    velocity_window: Duration,
}

impl RuleEngine {
    /// Create an engine from the rules section of the configuration.
    pub fn new(config: &RulesConfig) -> Self {
        Self {
            amount_threshold: config.amount_threshold,
            suspicious_merchants: config
                .suspicious_merchants
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
            velocity_window: Duration::seconds(config.velocity_window_secs),
        }
    }

    /// Score a batch. Scores are deterministic for a given input batch and
    /// independent of storage state.
    ///
    /// Returns `DataIntegrity` if a non-finite amount reaches the engine;
    /// the cleaner is expected to have dropped those.
    pub fn score(&self, transactions: Vec<Transaction>) -> PipelineResult<ScoreOutcome> {
        for tx in &transactions {
            if !tx.amount.is_finite() {
                return Err(PipelineError::DataIntegrity(format!(
                    "non-finite amount for transaction {}",
                    tx.transaction_id
                )));
            }
        }

        let elapsed = velocity::elapsed_since_previous(&transactions);

        let mut scored = Vec::with_capacity(transactions.len());
        let mut high_amount_triggers = 0;
        let mut merchant_triggers = 0;
        let mut velocity_triggers = 0;
        let mut flagged = 0;

        for (tx, since_previous) in transactions.into_iter().zip(elapsed) {
            let high_amount = self.is_high_amount(tx.amount);
            let suspicious = self.is_suspicious_merchant(&tx.merchant);
            let rapid = since_previous.is_some_and(|gap| gap < self.velocity_window);

            if high_amount {
                high_amount_triggers += 1;
            }
            if suspicious {
                merchant_triggers += 1;
            }
            if rapid {
                velocity_triggers += 1;
            }

            let fraud_score = u8::from(high_amount) + u8::from(suspicious) + u8::from(rapid);
            if fraud_score > 0 {
                flagged += 1;
            }
            scored.push(ScoredTransaction::new(tx, fraud_score));
        }

        info!(
            high_amount = high_amount_triggers,
            suspicious_merchant = merchant_triggers,
            velocity = velocity_triggers,
            flagged,
            "Rule scoring complete"
        );

        Ok(ScoreOutcome {
            transactions: scored,
            high_amount_triggers,
            merchant_triggers,
            velocity_triggers,
            flagged,
        })
    }

    fn is_high_amount(&self, amount: f64) -> bool {
        amount > self.amount_threshold
    }

    fn is_suspicious_merchant(&self, merchant: &str) -> bool {
        let merchant = merchant.to_lowercase();
        self.suspicious_merchants
            .iter()
            .any(|keyword| merchant.contains(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn engine() -> RuleEngine {
        RuleEngine::new(&RulesConfig::default())
    }

    fn tx(id: &str, user: &str, secs: i64, amount: f64, merchant: &str) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            timestamp: DateTime::<Utc>::from_timestamp(secs, 0).unwrap(),
            amount,
            merchant: merchant.to_string(),
            user_id: user.to_string(),
            is_fraud: false,
        }
    }

    #[test]
    fn test_amount_threshold_is_strict() {
        let outcome = engine()
            .score(vec![
                tx("T1", "U1", 0, 1000.0, "Shop"),
                tx("T2", "U2", 0, 1000.01, "Shop"),
            ])
            .unwrap();

        assert_eq!(outcome.transactions[0].fraud_score, 0);
        assert_eq!(outcome.transactions[1].fraud_score, 1);
        assert_eq!(outcome.high_amount_triggers, 1);
    }

    #[test]
    fn test_suspicious_merchant_matching_is_case_insensitive_substring() {
        let outcome = engine()
            .score(vec![
                tx("T1", "U1", 0, 5.0, "cryptoExchange"),
                tx("T2", "U2", 0, 5.0, "CRYPTO Exchange"),
                tx("T3", "U3", 0, 5.0, "Crypt of Curiosities"),
            ])
            .unwrap();

        assert_eq!(outcome.transactions[0].fraud_score, 1);
        assert_eq!(outcome.transactions[1].fraud_score, 1);
        assert_eq!(outcome.transactions[2].fraud_score, 0);
        assert_eq!(outcome.merchant_triggers, 2);
    }

    #[test]
    fn test_all_default_merchant_keywords_trigger() {
        let outcome = engine()
            .score(vec![
                tx("T1", "U1", 0, 5.0, "Casino Royale"),
                tx("T2", "U2", 0, 5.0, "Lucky Gaming"),
                tx("T3", "U3", 0, 5.0, "Crypto Corner"),
                tx("T4", "U4", 0, 5.0, "Betting House"),
            ])
            .unwrap();

        assert_eq!(outcome.merchant_triggers, 4);
    }

    #[test]
    fn test_velocity_window_is_strict() {
        let outcome = engine()
            .score(vec![
                tx("T1", "U1", 0, 5.0, "Shop"),
                tx("T2", "U1", 59, 5.0, "Shop"),
                tx("T3", "U1", 119, 5.0, "Shop"),
                tx("T4", "U1", 180, 5.0, "Shop"),
            ])
            .unwrap();

        // gaps: none, 59s, 60s, 61s
        assert_eq!(outcome.transactions[0].fraud_score, 0);
        assert_eq!(outcome.transactions[1].fraud_score, 1);
        assert_eq!(outcome.transactions[2].fraud_score, 0);
        assert_eq!(outcome.transactions[3].fraud_score, 0);
        assert_eq!(outcome.velocity_triggers, 1);
    }

    #[test]
    fn test_earliest_transaction_never_triggers_velocity() {
        let outcome = engine()
            .score(vec![tx("T1", "U1", 0, 5.0, "Shop")])
            .unwrap();

        assert_eq!(outcome.transactions[0].fraud_score, 0);
        assert_eq!(outcome.velocity_triggers, 0);
    }

    #[test]
    fn test_score_sums_rules_and_sets_flag() {
        let outcome = engine()
            .score(vec![
                tx("T1", "U1", 0, 2000.0, "Casino Royale"),
                tx("T2", "U1", 30, 2000.0, "Casino Royale"),
                tx("T3", "U2", 0, 5.0, "Shop"),
            ])
            .unwrap();

        assert_eq!(outcome.transactions[0].fraud_score, 2);
        assert_eq!(outcome.transactions[1].fraud_score, 3);
        assert_eq!(outcome.transactions[2].fraud_score, 0);
        assert!(outcome.transactions[0].rule_based_fraud_flag);
        assert!(outcome.transactions[1].rule_based_fraud_flag);
        assert!(!outcome.transactions[2].rule_based_fraud_flag);
        assert_eq!(outcome.flagged, 2);
    }

    #[test]
    fn test_non_finite_amount_is_rejected() {
        let result = engine().score(vec![tx("T1", "U1", 0, f64::NAN, "Shop")]);

        assert!(matches!(result, Err(PipelineError::DataIntegrity(_))));
    }

    #[test]
    fn test_output_preserves_input_order() {
        let outcome = engine()
            .score(vec![
                tx("T1", "U1", 100, 5.0, "Shop"),
                tx("T2", "U1", 0, 5.0, "Shop"),
                tx("T3", "U2", 50, 5.0, "Shop"),
            ])
            .unwrap();

        let ids: Vec<&str> = outcome
            .transactions
            .iter()
            .map(|tx| tx.transaction_id.as_str())
            .collect();
        assert_eq!(ids, vec!["T1", "T2", "T3"]);
    }
}
