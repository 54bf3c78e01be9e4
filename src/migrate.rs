use sqlx::SqlitePool;

/// Create the `match_history` table if it does not exist. Idempotent.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS match_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            resume_path TEXT NOT NULL,
            jd_path TEXT NOT NULL,
            tfidf_score REAL NOT NULL,
            skill_score REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
