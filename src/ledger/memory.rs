//! In-memory [`Ledger`] for tests and hosts that do not need durability.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{now_timestamp, Ledger, LedgerError};
use crate::models::{MatchRecord, NewMatch};

#[derive(Default)]
pub struct InMemoryLedger {
    records: Mutex<Vec<MatchRecord>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> LedgerError {
    LedgerError::Unavailable("ledger lock poisoned".to_string())
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn append(&self, entry: &NewMatch) -> Result<MatchRecord, LedgerError> {
        let mut records = self.records.lock().map_err(poisoned)?;
        let id = records.last().map(|r| r.id + 1).unwrap_or(1);
        let record = MatchRecord {
            id,
            timestamp: now_timestamp(),
            resume_path: entry.resume_path.clone(),
            jd_path: entry.jd_path.clone(),
            tfidf_score: entry.scores.tfidf_score,
            skill_score: entry.scores.skill_score,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<MatchRecord>, LedgerError> {
        let records = self.records.lock().map_err(poisoned)?;
        let skip = limit.map_or(0, |n| records.len().saturating_sub(n));
        Ok(records[skip..].to_vec())
    }

    async fn count(&self) -> Result<i64, LedgerError> {
        Ok(self.records.lock().map_err(poisoned)?.len() as i64)
    }
}
