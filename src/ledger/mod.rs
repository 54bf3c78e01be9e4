//! Append-only history of comparisons.
//!
//! The [`Ledger`] trait exposes `append` plus read operations; there is no
//! way to update or delete a record once written. Implementations must
//! assign unique, increasing ids even under concurrent appends.
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`SqliteLedger`] | Durable history in a SQLite file |
//! | [`InMemoryLedger`] | Tests and embedding without a database |

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{MatchRecord, NewMatch};

pub use memory::InMemoryLedger;
pub use sqlite::SqliteLedger;

/// A record could not be persisted or read.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Stamp, persist and return a new record. Returns only after the write
    /// is committed.
    async fn append(&self, entry: &NewMatch) -> Result<MatchRecord, LedgerError>;

    /// Records in insertion order. With a limit, only the most recent
    /// `limit` records are returned (still oldest first); `Some(0)` returns
    /// none.
    async fn list(&self, limit: Option<usize>) -> Result<Vec<MatchRecord>, LedgerError>;

    async fn count(&self) -> Result<i64, LedgerError>;
}

/// Current time as stored in the `timestamp` column.
pub(crate) fn now_timestamp() -> String {
    chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, false)
}
