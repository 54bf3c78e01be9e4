//! Similarity scores.
//!
//! - [`tfidf_similarity`]: cosine similarity of TF-IDF vectors fitted on the
//!   two-document corpus `{a, b}`.
//! - [`skill_score`]: share of the job description's skills covered by the
//!   resume.
//!
//! Both functions are pure and total over normalized input.

use std::collections::BTreeMap;

use crate::normalize::tokens;
use crate::skills::SkillSet;

/// Number of documents in the fitted corpus.
const CORPUS_SIZE: f64 = 2.0;

/// Term counts for both documents, keyed by term in sorted order.
fn term_counts<'a>(a: &'a str, b: &'a str) -> BTreeMap<&'a str, [u32; 2]> {
    let mut counts: BTreeMap<&str, [u32; 2]> = BTreeMap::new();
    for t in tokens(a) {
        counts.entry(t).or_default()[0] += 1;
    }
    for t in tokens(b) {
        counts.entry(t).or_default()[1] += 1;
    }
    counts
}

/// Smoothed inverse document frequency: `ln((1 + n) / (1 + df)) + 1`.
fn smoothed_idf(df: u32) -> f64 {
    ((1.0 + CORPUS_SIZE) / (1.0 + df as f64)).ln() + 1.0
}

/// TF-IDF cosine similarity of two normalized texts, in `[0, 1]`.
///
/// Returns `0.0` when either text has no tokens. Term weights are raw
/// counts times [`smoothed_idf`]; both vectors are L2-normalized before the
/// dot product. Terms are visited in sorted order, so the result is exactly
/// reproducible and exactly symmetric in its arguments.
pub fn tfidf_similarity(a: &str, b: &str) -> f64 {
    let counts = term_counts(a, b);
    if counts.values().all(|c| c[0] == 0) || counts.values().all(|c| c[1] == 0) {
        return 0.0;
    }

    let weights: Vec<(f64, f64)> = counts
        .values()
        .map(|c| {
            let df = (c[0] > 0) as u32 + (c[1] > 0) as u32;
            let idf = smoothed_idf(df);
            (c[0] as f64 * idf, c[1] as f64 * idf)
        })
        .collect();

    // Identical documents have identical weight vectors.
    if weights.iter().all(|(x, y)| x == y) {
        return 1.0;
    }

    let norm_a = weights.iter().map(|(x, _)| x * x).sum::<f64>().sqrt();
    let norm_b = weights.iter().map(|(_, y)| y * y).sum::<f64>().sqrt();
    let dot: f64 = weights
        .iter()
        .map(|(x, y)| (x / norm_a) * (y / norm_b))
        .sum();

    dot.clamp(0.0, 1.0)
}

/// `|resume ∩ jd| / |jd|`, or `0.0` when the job description has no skills.
pub fn skill_score(resume: &SkillSet, jd: &SkillSet) -> f64 {
    if jd.is_empty() {
        return 0.0;
    }
    jd.overlap(resume) as f64 / jd.len() as f64
}
