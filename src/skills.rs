//! Skill vocabulary and skill-set extraction.
//!
//! A [`SkillVocabulary`] is a fixed, ordered list of lowercase phrases.
//! [`SkillVocabulary::extract`] returns the phrases present in a normalized
//! text as a [`SkillSet`], kept in vocabulary order.
//!
//! # Matching modes
//!
//! | Mode | Rule |
//! |------|------|
//! | [`SkillMatchMode::Token`] | The whole phrase must equal one token of the text. |
//! | [`SkillMatchMode::Phrase`] | The normalized phrase must appear on token boundaries. |
//!
//! Token mode is the default and reproduces the historical scores: because
//! normalization always separates words with a space, multi-word phrases
//! such as `"machine learning"` (and punctuated ones such as `"c++"`) can
//! never match in this mode.

use serde::Serialize;
use std::collections::HashSet;

use crate::normalize::{normalize, tokens};

/// The built-in vocabulary.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python",
    "sql",
    "machine learning",
    "nlp",
    "tensorflow",
    "deep learning",
    "pandas",
    "numpy",
    "excel",
    "data analysis",
    "communication",
    "java",
    "c++",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkillMatchMode {
    #[default]
    Token,
    Phrase,
}

impl SkillMatchMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" => Some(Self::Token),
            "phrase" => Some(Self::Phrase),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    phrases: Vec<String>,
    mode: SkillMatchMode,
}

impl SkillVocabulary {
    /// Build a vocabulary. Phrases are lowercased and trimmed; empty entries
    /// and repeats are dropped, keeping the first occurrence's position.
    pub fn new<I, S>(phrases: I, mode: SkillMatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let phrases = phrases
            .into_iter()
            .map(|p| p.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty() && seen.insert(p.clone()))
            .collect();
        Self { phrases, mode }
    }

    pub fn phrases(&self) -> &[String] {
        &self.phrases
    }

    pub fn mode(&self) -> SkillMatchMode {
        self.mode
    }

    /// Skills from this vocabulary present in `normalized`.
    pub fn extract(&self, normalized: &str) -> SkillSet {
        let found = match self.mode {
            SkillMatchMode::Token => {
                let token_set: HashSet<&str> = tokens(normalized).collect();
                self.phrases
                    .iter()
                    .filter(|p| token_set.contains(p.as_str()))
                    .cloned()
                    .collect()
            }
            SkillMatchMode::Phrase => {
                let padded = format!(" {} ", normalized);
                self.phrases
                    .iter()
                    .filter(|p| {
                        let needle = normalize(p);
                        !needle.is_empty() && padded.contains(&format!(" {} ", needle))
                    })
                    .cloned()
                    .collect()
            }
        };
        SkillSet(found)
    }
}

/// Skills from `vocabulary` present in `normalized`.
pub fn extract_skills(normalized: &str, vocabulary: &SkillVocabulary) -> SkillSet {
    vocabulary.extract(normalized)
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied(), SkillMatchMode::Token)
    }
}

/// Skills found in one document, in vocabulary order. Compared as a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillSet(Vec<String>);

impl SkillSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.iter().any(|s| s == skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of skills present in both sets.
    pub fn overlap(&self, other: &SkillSet) -> usize {
        self.iter().filter(|s| other.contains(s)).count()
    }
}

impl<S: Into<String>> FromIterator<S> for SkillSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut out: Vec<String> = Vec::new();
        for s in iter {
            let s = s.into();
            if !out.contains(&s) {
                out.push(s);
            }
        }
        SkillSet(out)
    }
}
