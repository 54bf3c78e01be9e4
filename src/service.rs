//! The comparison pipeline.
//!
//! [`MatchService::run_match`] is the single entry point used by every front
//! end:
//!
//! ```text
//! extract ×2 ─▶ normalize ×2 ─▶ tfidf_similarity
//!                          └──▶ extract_skills ×2 ─▶ skill_score
//!                                                   └──▶ ledger.append
//! ```
//!
//! Extraction failures abort before anything is written. A ledger failure
//! after scoring is reported as [`MatchError::NotRecorded`], which still
//! carries the computed scores.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::Config;
use crate::extract::{ExtractError, Extractor};
use crate::ledger::{Ledger, LedgerError};
use crate::models::{DocumentRole, MatchScores, NewMatch};
use crate::normalize::normalize;
use crate::score::{skill_score, tfidf_similarity};
use crate::skills::{extract_skills, SkillSet, SkillVocabulary};

#[derive(Debug, Error)]
pub enum MatchError {
    /// No result: a document could not be read.
    #[error("could not read {role}")]
    Extraction {
        role: DocumentRole,
        #[source]
        source: ExtractError,
    },

    /// A result was computed but could not be recorded.
    #[error(
        "scores computed (TF-IDF {:.2}%, skills {:.2}%) but not recorded",
        .scores.tfidf_score * 100.0,
        .scores.skill_score * 100.0
    )]
    NotRecorded {
        scores: MatchScores,
        #[source]
        source: LedgerError,
    },
}

/// Outcome of one recorded comparison.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub record_id: i64,
    pub timestamp: String,
    pub tfidf_score: f64,
    pub skill_score: f64,
    pub resume_skills: SkillSet,
    pub jd_skills: SkillSet,
}

impl MatchReport {
    pub fn scores(&self) -> MatchScores {
        MatchScores {
            tfidf_score: self.tfidf_score,
            skill_score: self.skill_score,
        }
    }
}

pub struct MatchService {
    extractor: Extractor,
    vocabulary: SkillVocabulary,
    ledger: Arc<dyn Ledger>,
}

impl MatchService {
    pub fn new(extractor: Extractor, vocabulary: SkillVocabulary, ledger: Arc<dyn Ledger>) -> Self {
        Self {
            extractor,
            vocabulary,
            ledger,
        }
    }

    /// Build a service from configuration around an already-open ledger.
    pub fn from_config(config: &Config, ledger: Arc<dyn Ledger>) -> Self {
        let vocabulary = SkillVocabulary::new(&config.skills.vocabulary, config.skills.mode());
        Self::new(Extractor::from_config(&config.extraction), vocabulary, ledger)
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    /// Compare a resume against a job description and record the result.
    pub async fn run_match(
        &self,
        resume_path: &Path,
        jd_path: &Path,
    ) -> Result<MatchReport, MatchError> {
        let resume_text = self
            .extractor
            .extract(resume_path)
            .await
            .map_err(|source| MatchError::Extraction {
                role: DocumentRole::Resume,
                source,
            })?;
        let jd_text = self
            .extractor
            .extract(jd_path)
            .await
            .map_err(|source| MatchError::Extraction {
                role: DocumentRole::JobDescription,
                source,
            })?;

        let resume_clean = normalize(&resume_text);
        let jd_clean = normalize(&jd_text);

        let resume_skills = extract_skills(&resume_clean, &self.vocabulary);
        let jd_skills = extract_skills(&jd_clean, &self.vocabulary);
        let scores = MatchScores {
            tfidf_score: tfidf_similarity(&resume_clean, &jd_clean),
            skill_score: skill_score(&resume_skills, &jd_skills),
        };

        let entry = NewMatch {
            resume_path: resume_path.display().to_string(),
            jd_path: jd_path.display().to_string(),
            scores,
        };
        let record = self
            .ledger
            .append(&entry)
            .await
            .map_err(|source| MatchError::NotRecorded { scores, source })?;

        tracing::info!(
            id = record.id,
            "match recorded: {} vs {} | TF-IDF: {:.4} | Skill: {:.4}",
            entry.resume_path,
            entry.jd_path,
            scores.tfidf_score,
            scores.skill_score
        );

        Ok(MatchReport {
            record_id: record.id,
            timestamp: record.timestamp,
            tfidf_score: scores.tfidf_score,
            skill_score: scores.skill_score,
            resume_skills,
            jd_skills,
        })
    }
}
