//! SQLite sink for scored transactions.
//!
//! All database access in the pipeline goes through this module. Writes are
//! idempotent: the table keys on `transaction_id` and re-inserting an
//! existing id is a no-op that keeps the stored row.

use crate::error::PipelineResult;
use crate::types::transaction::ScoredTransaction;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::info;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS transactions (
    transaction_id TEXT PRIMARY KEY,
    timestamp DATETIME NOT NULL,
    amount REAL NOT NULL,
    merchant TEXT NOT NULL,
    user_id TEXT NOT NULL,
    is_fraud BOOLEAN NOT NULL,
    rule_based_fraud_flag BOOLEAN NOT NULL,
    fraud_score INTEGER NOT NULL,
    processed_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_timestamp ON transactions(timestamp);
CREATE INDEX IF NOT EXISTS idx_user_id ON transactions(user_id);
CREATE INDEX IF NOT EXISTS idx_fraud_flag ON transactions(rule_based_fraud_flag);
"#;

/// A row read back from the transactions table.
#[derive(Debug, Clone)]
pub struct StoredTransaction {
    pub transaction_id: String,
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
    pub merchant: String,
    pub user_id: String,
    pub is_fraud: bool,
    pub rule_based_fraud_flag: bool,
    pub fraud_score: u8,
    pub processed_at: DateTime<Utc>,
}

/// SQLite-backed storage for scored transactions.
pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let conn = Connection::open(path)?;
        // In-memory databases reject WAL; the pragma is best effort.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Self::with_connection(conn)
    }

    /// Open an in-memory database, mainly for tests.
    pub fn in_memory() -> PipelineResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> PipelineResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert a batch atomically. Rows whose `transaction_id` already exists
    /// are skipped. Returns the number of rows actually inserted.
    pub fn write_batch(&mut self, records: &[ScoredTransaction]) -> PipelineResult<usize> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO transactions
                 (transaction_id, timestamp, amount, merchant, user_id,
                  is_fraud, rule_based_fraud_flag, fraud_score)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for record in records {
                inserted += stmt.execute(params![
                    record.transaction_id,
                    record.timestamp,
                    record.amount,
                    record.merchant,
                    record.user_id,
                    record.is_fraud,
                    record.rule_based_fraud_flag,
                    record.fraud_score,
                ])?;
            }
        }
        tx.commit()?;

        let skipped = records.len() - inserted;
        if skipped > 0 {
            info!(skipped, "Skipped rows with an already-stored transaction_id");
        }
        info!(inserted, "Stored scored transactions");
        Ok(inserted)
    }

    /// Total stored rows.
    pub fn count(&self) -> PipelineResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Stored rows with the rule-based fraud flag set.
    pub fn flagged_count(&self) -> PipelineResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE rule_based_fraud_flag = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Fetch one stored row by id.
    pub fn get(&self, transaction_id: &str) -> PipelineResult<Option<StoredTransaction>> {
        let row = self
            .conn
            .query_row(
                "SELECT transaction_id, timestamp, amount, merchant, user_id,
                        is_fraud, rule_based_fraud_flag, fraud_score, processed_at
                 FROM transactions WHERE transaction_id = ?1",
                params![transaction_id],
                |row| {
                    Ok(StoredTransaction {
                        transaction_id: row.get(0)?,
                        timestamp: row.get(1)?,
                        amount: row.get(2)?,
                        merchant: row.get(3)?,
                        user_id: row.get(4)?,
                        is_fraud: row.get(5)?,
                        rule_based_fraud_flag: row.get(6)?,
                        fraud_score: row.get(7)?,
                        processed_at: row.get(8)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction::Transaction;

    fn scored(id: &str, amount: f64, fraud_score: u8) -> ScoredTransaction {
        ScoredTransaction::new(
            Transaction {
                transaction_id: id.to_string(),
                timestamp: DateTime::<Utc>::from_timestamp(1_709_287_200, 0).unwrap(),
                amount,
                merchant: "Shop".to_string(),
                user_id: "U1".to_string(),
                is_fraud: false,
            },
            fraud_score,
        )
    }

    #[test]
    fn test_write_and_read_back() {
        let mut sink = SqliteSink::in_memory().unwrap();
        let batch = vec![scored("T1", 1500.0, 2), scored("T2", 5.0, 0)];

        let inserted = sink.write_batch(&batch).unwrap();
        assert_eq!(inserted, 2);

        let stored = sink.get("T1").unwrap().unwrap();
        assert_eq!(stored.transaction_id, "T1");
        assert_eq!(stored.timestamp, batch[0].timestamp);
        assert_eq!(stored.amount, 1500.0);
        assert_eq!(stored.merchant, "Shop");
        assert_eq!(stored.user_id, "U1");
        assert!(!stored.is_fraud);
        assert!(stored.rule_based_fraud_flag);
        assert_eq!(stored.fraud_score, 2);
        assert!(stored.processed_at.timestamp() > 0);

        assert!(sink.get("T9").unwrap().is_none());
    }

    #[test]
    fn test_existing_rows_are_not_overwritten() {
        let mut sink = SqliteSink::in_memory().unwrap();
        sink.write_batch(&[scored("T1", 10.0, 0)]).unwrap();

        let inserted = sink.write_batch(&[scored("T1", 999.0, 3)]).unwrap();

        assert_eq!(inserted, 0);
        assert_eq!(sink.count().unwrap(), 1);
        let stored = sink.get("T1").unwrap().unwrap();
        assert_eq!(stored.amount, 10.0);
        assert_eq!(stored.fraud_score, 0);
    }

    #[test]
    fn test_counts() {
        let mut sink = SqliteSink::in_memory().unwrap();
        sink.write_batch(&[
            scored("T1", 1500.0, 1),
            scored("T2", 5.0, 0),
            scored("T3", 2000.0, 2),
        ])
        .unwrap();

        assert_eq!(sink.count().unwrap(), 3);
        assert_eq!(sink.flagged_count().unwrap(), 2);
    }
}
