//! Per-user transaction velocity.

use crate::types::transaction::Transaction;
use chrono::Duration;
use std::collections::HashMap;

/// For each transaction, the time elapsed since the same user's previous
/// transaction in timestamp order, or `None` for the user's earliest.
///
/// The result is positionally aligned with the input slice. Ordering within
/// a user is by timestamp, with input order breaking ties, so identical
/// timestamps yield a zero gap rather than `None`.
pub fn elapsed_since_previous(transactions: &[Transaction]) -> Vec<Option<Duration>> {
    let mut by_user: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, tx) in transactions.iter().enumerate() {
        by_user.entry(tx.user_id.as_str()).or_default().push(idx);
    }

    let mut elapsed = vec![None; transactions.len()];
    for indices in by_user.values_mut() {
        indices.sort_by_key(|&idx| (transactions[idx].timestamp, idx));
        for pair in indices.windows(2) {
            let (prev, curr) = (pair[0], pair[1]);
            elapsed[curr] =
                Some(transactions[curr].timestamp - transactions[prev].timestamp);
        }
    }
    elapsed
}
