//! SQLite-backed [`Ledger`].
//!
//! Ids come from the `AUTOINCREMENT` primary key, so concurrent appends
//! through the pool never collide and never reuse an id.

use std::path::Path;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use super::{now_timestamp, Ledger, LedgerError};
use crate::db;
use crate::migrate;
use crate::models::{MatchRecord, NewMatch};

pub struct SqliteLedger {
    pool: SqlitePool,
}

impl SqliteLedger {
    /// Open the database at `path`, creating the file and schema if absent.
    pub async fn open(path: &Path) -> Result<Self, LedgerError> {
        let pool = db::connect(path).await?;
        migrate::run_migrations(&pool).await?;
        tracing::debug!(path = %path.display(), "opened match history");
        Ok(Self { pool })
    }

    /// Wrap an existing pool. The schema is created if absent.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, LedgerError> {
        migrate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Release all pooled connections.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> MatchRecord {
    MatchRecord {
        id: row.get("id"),
        timestamp: row.get("timestamp"),
        resume_path: row.get("resume_path"),
        jd_path: row.get("jd_path"),
        tfidf_score: row.get("tfidf_score"),
        skill_score: row.get("skill_score"),
    }
}

#[async_trait]
impl Ledger for SqliteLedger {
    async fn append(&self, entry: &NewMatch) -> Result<MatchRecord, LedgerError> {
        let timestamp = now_timestamp();
        let result = sqlx::query(
            r#"
            INSERT INTO match_history (timestamp, resume_path, jd_path, tfidf_score, skill_score)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&timestamp)
        .bind(&entry.resume_path)
        .bind(&entry.jd_path)
        .bind(entry.scores.tfidf_score)
        .bind(entry.scores.skill_score)
        .execute(&self.pool)
        .await?;

        Ok(MatchRecord {
            id: result.last_insert_rowid(),
            timestamp,
            resume_path: entry.resume_path.clone(),
            jd_path: entry.jd_path.clone(),
            tfidf_score: entry.scores.tfidf_score,
            skill_score: entry.scores.skill_score,
        })
    }

    async fn list(&self, limit: Option<usize>) -> Result<Vec<MatchRecord>, LedgerError> {
        let rows = sqlx::query(
            r#"
            SELECT id, timestamp, resume_path, jd_path, tfidf_score, skill_score
            FROM (
                SELECT * FROM match_history
                ORDER BY id DESC
                LIMIT ?
            )
            ORDER BY id ASC
            "#,
        )
        // SQLite treats a negative LIMIT as unbounded.
        .bind(limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX)))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    async fn count(&self) -> Result<i64, LedgerError> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM match_history")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }
}
