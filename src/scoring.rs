// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Relevance scoring and result ordering.
//!
//! Term and phrase clauses score with BM25. Pattern and range clauses don't
//! have a meaningful term frequency, so every match gets the same constant.
//!
//! ```text
//! idf(t)     = ln(1 + (N - df + 0.5) / (df + 0.5))
//! bm25(t, d) = idf(t) · tf / (tf + k1 · (1 - b + b · |d| / avgdl))
//! ```

use crate::types::ScoredHit;
use std::cmp::Ordering;

// =============================================================================
// SCORING CONSTANTS
// =============================================================================

/// Term frequency saturation.
pub const BM25_K1: f64 = 1.2;

/// Length normalization strength.
pub const BM25_B: f64 = 0.75;

/// Score of every wildcard, regexp and range match.
pub const CONSTANT_SCORE: f64 = 1.0;

/// Inverse document frequency. Always positive, even for a term in every
/// document.
pub fn idf(doc_count: usize, doc_freq: usize) -> f64 {
    let n = doc_count as f64;
    let df = doc_freq as f64;
    (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
}

/// BM25 contribution of one term (or phrase) in one document.
pub fn bm25(freq: f64, idf: f64, doc_len: f64, avg_len: f64) -> f64 {
    if freq <= 0.0 {
        return 0.0;
    }
    let norm = BM25_K1 * (1.0 - BM25_B + BM25_B * doc_len / avg_len.max(f64::MIN_POSITIVE));
    idf * freq / (freq + norm)
}

// =============================================================================
// RANKING
// =============================================================================

/// Compare two hits for ranking.
///
/// Sort order:
/// 1. **Score** - descending
/// 2. **Ordinal** - ascending, so equal scores keep source order
pub fn compare_hits(a: &ScoredHit, b: &ScoredHit) -> Ordering {
    match b.score.total_cmp(&a.score) {
        Ordering::Equal => a.doc.cmp(&b.doc),
        ord => ord,
    }
}

/// Sort hits best first and keep at most `max_results`.
pub fn rank(mut hits: Vec<ScoredHit>, max_results: usize) -> Vec<ScoredHit> {
    hits.sort_by(compare_hits);
    hits.truncate(max_results);
    hits
}
