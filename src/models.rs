//! Core data types shared by the pipeline, the ledger and the shells.

use serde::Serialize;

/// The two scores produced by one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchScores {
    pub tfidf_score: f64,
    pub skill_score: f64,
}

/// One persisted comparison. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub id: i64,
    /// RFC 3339 creation time.
    pub timestamp: String,
    pub resume_path: String,
    pub jd_path: String,
    pub tfidf_score: f64,
    pub skill_score: f64,
}

impl MatchRecord {
    pub fn scores(&self) -> MatchScores {
        MatchScores {
            tfidf_score: self.tfidf_score,
            skill_score: self.skill_score,
        }
    }
}

/// Fields of a record supplied by the caller; the ledger assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewMatch {
    pub resume_path: String,
    pub jd_path: String,
    pub scores: MatchScores,
}

/// Which side of a comparison a document plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    Resume,
    JobDescription,
}

impl std::fmt::Display for DocumentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentRole::Resume => write!(f, "resume"),
            DocumentRole::JobDescription => write!(f, "job description"),
        }
    }
}
