//! `rmatch history`: print stored comparisons.

use anyhow::Result;

use crate::ledger::Ledger;
use crate::models::MatchRecord;

/// Print the most recent `limit` records (all when `None`), oldest first.
pub async fn run_history(ledger: &dyn Ledger, limit: Option<usize>) -> Result<()> {
    let total = ledger.count().await?;
    let records = ledger.list(limit).await?;

    if records.is_empty() {
        println!("No matches recorded.");
        return Ok(());
    }

    println!(
        "{:>6}  {:<32}  {:>8}  {:>8}  RESUME -> JOB DESCRIPTION",
        "ID", "TIMESTAMP", "TF-IDF", "SKILLS"
    );
    for r in &records {
        println!("{}", format_row(r));
    }
    println!();
    println!("{} of {} record(s) shown.", records.len(), total);
    Ok(())
}

fn format_row(r: &MatchRecord) -> String {
    format!(
        "{:>6}  {:<32}  {:>7.2}%  {:>7.2}%  {} -> {}",
        r.id,
        r.timestamp,
        r.tfidf_score * 100.0,
        r.skill_score * 100.0,
        r.resume_path,
        r.jd_path
    )
}
