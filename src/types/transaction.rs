//! Transaction record types for the fraud data pipeline

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// A transaction row exactly as it appears in the source file.
///
/// Every field is optional: the source is allowed to contain empty cells,
/// and deciding what to do with them is the Cleaner's job, not the Loader's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Unique transaction identifier
    pub transaction_id: Option<String>,

    /// Timestamp as written in the source, not yet parsed
    pub timestamp: Option<String>,

    /// Transaction amount
    pub amount: Option<f64>,

    /// Merchant label, not yet normalized
    pub merchant: Option<String>,

    /// Grouping key for the rapid-repeat rule
    pub user_id: Option<String>,

    /// Ground-truth fraud label; sources write it as 0/1 or as
    /// true/false literals (capitalized variants included)
    #[serde(deserialize_with = "deserialize_label")]
    pub is_fraud: Option<bool>,
}

fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "0" | "false" => Ok(Some(false)),
            "1" | "true" => Ok(Some(true)),
            other => Err(de::Error::custom(format!(
                "invalid is_fraud label '{other}'"
            ))),
        },
    }
}

/// A canonical transaction: deduplicated, null-free, merchant normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction identifier
    pub transaction_id: String,

    /// Parsed timestamp (UTC)
    pub timestamp: DateTime<Utc>,

    /// Transaction amount, always finite
    pub amount: f64,

    /// Normalized merchant name
    pub merchant: String,

    /// Grouping key for the rapid-repeat rule
    pub user_id: String,

    /// Ground-truth fraud label, carried through for reporting only
    pub is_fraud: bool,
}

/// A transaction with rule-based scoring attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTransaction {
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
    pub merchant: String,
    pub user_id: String,
    pub is_fraud: bool,

    /// True when at least one rule fired
    pub rule_based_fraud_flag: bool,

    /// Number of rules that fired (0-3)
    pub fraud_score: u8,
}

impl ScoredTransaction {
    /// Attach a rule score to a cleaned transaction.
    ///
    /// The flag is derived from the score, so the two can never disagree.
    pub fn new(transaction: Transaction, fraud_score: u8) -> Self {
        Self {
            transaction_id: transaction.transaction_id,
            timestamp: transaction.timestamp,
            amount: transaction.amount,
            merchant: transaction.merchant,
            user_id: transaction.user_id,
            is_fraud: transaction.is_fraud,
            rule_based_fraud_flag: fraud_score > 0,
            fraud_score,
        }
    }
}
