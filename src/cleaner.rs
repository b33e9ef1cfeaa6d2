//! Data cleaning: deduplication, timestamp parsing, null handling, and
//! merchant normalization.

use crate::types::transaction::{RawTransaction, Transaction};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashSet;
use tracing::info;

/// Result of a cleaning pass: the canonical set plus removal counts.
#[derive(Debug)]
pub struct CleanOutcome {
    /// Canonical transactions, in surviving input order
    pub transactions: Vec<Transaction>,
    /// Later occurrences of an already-seen transaction_id
    pub duplicates_removed: usize,
    /// Records dropped for a missing or unparseable required field
    pub invalid_removed: usize,
}

/// Cleans raw records into the canonical transaction set.
///
/// Steps run in a fixed order: deduplicate by `transaction_id` (first
/// occurrence in input order wins), parse timestamps, drop records with
/// missing fields, normalize merchant names. Duplicates are judged against
/// the raw input, before any record is dropped as invalid.
pub struct Cleaner;

impl Cleaner {
    /// Create a new cleaner.
    pub fn new() -> Self {
        Self
    }

    /// Run the full cleaning sequence. Empty input yields an empty outcome.
    pub fn clean(&self, records: Vec<RawTransaction>) -> CleanOutcome {
        let input_count = records.len();

        let mut seen_ids = HashSet::new();
        let mut deduped = Vec::with_capacity(records.len());
        for record in records {
            // Records without an id cannot collide; they fall through to the
            // missing-field drop instead.
            if let Some(id) = &record.transaction_id {
                if !seen_ids.insert(id.clone()) {
                    continue;
                }
            }
            deduped.push(record);
        }
        let duplicates_removed = input_count - deduped.len();

        let deduped_count = deduped.len();
        let transactions: Vec<Transaction> =
            deduped.into_iter().filter_map(canonicalize).collect();
        let invalid_removed = deduped_count - transactions.len();

        info!(
            input = input_count,
            kept = transactions.len(),
            duplicates_removed,
            invalid_removed,
            "Cleaning complete"
        );

        CleanOutcome {
            transactions,
            duplicates_removed,
            invalid_removed,
        }
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a raw record into a canonical transaction, or `None` when any
/// required field is missing or unparseable.
fn canonicalize(record: RawTransaction) -> Option<Transaction> {
    let transaction_id = record.transaction_id?;
    let timestamp = parse_timestamp(record.timestamp.as_deref()?)?;
    let amount = record.amount.filter(|a| a.is_finite())?;
    let merchant = normalize_merchant(&record.merchant?);
    let user_id = record.user_id?;
    let is_fraud = record.is_fraud?;

    Some(Transaction {
        transaction_id,
        timestamp,
        amount,
        merchant,
        user_id,
        is_fraud,
    })
}

/// Parse a source timestamp: RFC 3339, or the bare
/// `YYYY-MM-DD HH:MM:SS[.frac]` form interpreted as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Strip surrounding whitespace, then drop every character that is not
/// alphanumeric, whitespace, or underscore.
fn normalize_merchant(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect()
}
