// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Clause evaluation against an ephemeral index.
//!
//! Each clause evaluates to a score set (`ordinal -> score`). Leaves read the
//! index directly; booleans combine their children's sets:
//!
//! ```text
//! Must     intersect, scores summed
//! Should   union, scores summed; required only when there is no Must
//! MustNot  removed from the result, never scored
//! ```
//!
//! A boolean made only of `MustNot` children has nothing to subtract from and
//! matches nothing.

use super::matchers::{numeric_bounds, PatternMatcher, TermMatcher, TermRange};
use crate::error::IndexIoError;
use crate::query::{Bound, Clause, Occur};
use crate::scoring::{bm25, idf, rank, CONSTANT_SCORE};
use crate::types::{DocOrd, EphemeralIndex, FieldIndex, Posting, ScoredHit};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Matching ordinals and their scores. Ordered so evaluation is deterministic.
type ScoreSet = BTreeMap<DocOrd, f64>;

/// Evaluate `clause`, returning at most `max_results` hits, best first.
pub fn evaluate(
    index: &EphemeralIndex,
    clause: &Clause,
    max_results: usize,
) -> Result<Vec<ScoredHit>, IndexIoError> {
    let scores = Evaluator { index }.eval(clause)?;
    let matched = scores.len();

    let hits = scores
        .into_iter()
        .map(|(doc, score)| ScoredHit { doc, score })
        .collect();
    let ranked = rank(hits, max_results);

    debug!(
        docs = index.doc_count(),
        matched,
        returned = ranked.len(),
        "evaluated query"
    );
    Ok(ranked)
}

struct Evaluator<'a> {
    index: &'a EphemeralIndex,
}

impl Evaluator<'_> {
    fn eval(&self, clause: &Clause) -> Result<ScoreSet, IndexIoError> {
        match clause {
            Clause::Term { field, text } => Ok(self.term(field, text)),
            Clause::Phrase { field, terms } => Ok(self.phrase(field, terms)),
            Clause::Wildcard { field, pattern } => {
                Ok(self.multi_term(field, &PatternMatcher::wildcard(pattern)?))
            }
            Clause::Regexp { field, pattern } => {
                Ok(self.multi_term(field, &PatternMatcher::regexp(pattern)?))
            }
            Clause::Range {
                field,
                lower,
                upper,
            } => Ok(self.range(field, lower, upper)),
            Clause::Boolean(children) => self.boolean(children),
        }
    }

    fn term(&self, field: &str, text: &str) -> ScoreSet {
        let Some(index) = self.index.field(field) else {
            return ScoreSet::new();
        };
        let Some(list) = index.terms.get(text) else {
            return ScoreSet::new();
        };

        let term_idf = idf(self.index.doc_count(), list.doc_freq);
        let avg = index.average_length();

        list.postings
            .iter()
            .map(|p| {
                let len = f64::from(index.length_of(p.doc));
                (p.doc, bm25(p.freq() as f64, term_idf, len, avg))
            })
            .collect()
    }

    /// Documents where `terms` occur at consecutive positions.
    fn phrase(&self, field: &str, terms: &[String]) -> ScoreSet {
        let mut scores = ScoreSet::new();
        let Some(index) = self.index.field(field) else {
            return scores;
        };

        let mut lists = Vec::with_capacity(terms.len());
        for term in terms {
            match index.terms.get(term) {
                Some(list) => lists.push(list),
                None => return scores,
            }
        }
        let Some((first, rest)) = lists.split_first() else {
            return scores;
        };

        let phrase_idf: f64 = lists
            .iter()
            .map(|l| idf(self.index.doc_count(), l.doc_freq))
            .sum();
        let avg = index.average_length();

        for posting in &first.postings {
            let mut following = Vec::with_capacity(rest.len());
            for list in rest {
                match find_posting(&list.postings, posting.doc) {
                    Some(p) => following.push(p),
                    None => break,
                }
            }
            if following.len() != rest.len() {
                continue;
            }

            let freq = posting
                .positions
                .iter()
                .filter(|&&start| {
                    following.iter().enumerate().all(|(i, p)| {
                        p.positions
                            .binary_search(&(start + i as u32 + 1))
                            .is_ok()
                    })
                })
                .count();

            if freq > 0 {
                let len = f64::from(index.length_of(posting.doc));
                scores.insert(posting.doc, bm25(freq as f64, phrase_idf, len, avg));
            }
        }

        scores
    }

    /// Constant-score union over every dictionary term the matcher accepts.
    fn multi_term(&self, field: &str, matcher: &dyn TermMatcher) -> ScoreSet {
        let mut scores = ScoreSet::new();
        let Some(index) = self.index.field(field) else {
            return scores;
        };

        for (term, list) in &index.terms {
            if matcher.matches(term) {
                for posting in &list.postings {
                    scores.insert(posting.doc, CONSTANT_SCORE);
                }
            }
        }
        scores
    }

    fn range(&self, field: &str, lower: &Bound, upper: &Bound) -> ScoreSet {
        match numeric_bounds(lower, upper) {
            Some(Some((lo, hi))) => match self.index.field(field) {
                Some(index) => points_between(index, lo, hi),
                None => ScoreSet::new(),
            },
            Some(None) => ScoreSet::new(),
            None => self.multi_term(field, &TermRange { lower, upper }),
        }
    }

    fn boolean(&self, children: &[(Occur, Clause)]) -> Result<ScoreSet, IndexIoError> {
        let mut must: Option<ScoreSet> = None;
        let mut should = ScoreSet::new();
        let mut has_should = false;
        let mut excluded = BTreeSet::new();

        for (occur, child) in children {
            let scores = self.eval(child)?;
            match occur {
                Occur::Must => {
                    must = Some(match must {
                        None => scores,
                        Some(acc) => intersect(acc, &scores),
                    });
                }
                Occur::Should => {
                    has_should = true;
                    for (doc, score) in scores {
                        *should.entry(doc).or_insert(0.0) += score;
                    }
                }
                Occur::MustNot => excluded.extend(scores.into_keys()),
            }
        }

        let mut result = match must {
            Some(mut required) => {
                for (doc, score) in required.iter_mut() {
                    if let Some(extra) = should.get(doc) {
                        *score += extra;
                    }
                }
                required
            }
            None if has_should => should,
            None => ScoreSet::new(),
        };

        result.retain(|doc, _| !excluded.contains(doc));
        Ok(result)
    }
}

/// Keep documents present in both sets, summing their scores.
fn intersect(mut acc: ScoreSet, other: &ScoreSet) -> ScoreSet {
    acc.retain(|doc, score| match other.get(doc) {
        Some(extra) => {
            *score += extra;
            true
        }
        None => false,
    });
    acc
}

fn find_posting(postings: &[Posting], doc: DocOrd) -> Option<&Posting> {
    postings
        .binary_search_by_key(&doc, |p| p.doc)
        .ok()
        .map(|i| &postings[i])
}

/// Constant-score set of documents with a point in `lo..=hi`.
fn points_between(index: &FieldIndex, lo: i64, hi: i64) -> ScoreSet {
    let start = index.points.partition_point(|(v, _)| *v < lo);
    let end = index.points.partition_point(|(v, _)| *v <= hi);
    index.points[start..end.max(start)]
        .iter()
        .map(|(_, doc)| (*doc, CONSTANT_SCORE))
        .collect()
}
