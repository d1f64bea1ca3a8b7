// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Term matchers for multi-term clauses.
//!
//! Wildcard, regexp and lexicographic range clauses all boil down to the same
//! loop: walk a field's term dictionary and keep the terms a predicate accepts.
//! [`TermMatcher`] is that predicate.

use crate::error::IndexIoError;
use crate::query::Bound;
use regex::Regex;

/// Decides whether one dictionary term belongs to a clause.
pub trait TermMatcher {
    fn matches(&self, term: &str) -> bool;
}

/// A compiled pattern that must match the whole term.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    rx: Regex,
}

impl PatternMatcher {
    /// Compile a regular expression, anchored at both ends.
    pub fn regexp(pattern: &str) -> Result<Self, IndexIoError> {
        compile(pattern, &format!("^(?:{pattern})$"))
    }

    /// Compile a `*`/`?` wildcard. Backslash makes the next character literal.
    pub fn wildcard(pattern: &str) -> Result<Self, IndexIoError> {
        compile(pattern, &wildcard_to_regex(pattern))
    }
}

impl TermMatcher for PatternMatcher {
    #[inline]
    fn matches(&self, term: &str) -> bool {
        self.rx.is_match(term)
    }
}

fn compile(pattern: &str, rx: &str) -> Result<PatternMatcher, IndexIoError> {
    Regex::new(rx)
        .map(|rx| PatternMatcher { rx })
        .map_err(|source| IndexIoError::InvalidPattern {
            pattern: pattern.to_string(),
            source: Box::new(source),
        })
}

/// Wildcard → anchored regex source with dotall semantics.
pub fn wildcard_to_regex(pattern: &str) -> String {
    let mut rx = String::from("(?s)^");
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '*' => rx.push_str(".*"),
            '?' => rx.push('.'),
            '\\' => {
                if let Some(escaped) = chars.next() {
                    rx.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4])));
                }
            }
            c => rx.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    rx.push('$');
    rx
}

/// Lexicographic range over terms.
#[derive(Debug, Clone)]
pub struct TermRange<'a> {
    pub lower: &'a Bound,
    pub upper: &'a Bound,
}

impl TermMatcher for TermRange<'_> {
    fn matches(&self, term: &str) -> bool {
        let above = match self.lower {
            Bound::Unbounded => true,
            Bound::Inclusive(v) => term >= v.as_str(),
            Bound::Exclusive(v) => term > v.as_str(),
        };
        let below = match self.upper {
            Bound::Unbounded => true,
            Bound::Inclusive(v) => term <= v.as_str(),
            Bound::Exclusive(v) => term < v.as_str(),
        };
        above && below
    }
}

/// Integer form of a range, if both ends are integers or open.
///
/// Returns `Some(None)` for a numeric range that can never match (e.g.
/// `{5 TO 5}` or a lower bound above the upper), `None` when the range is
/// not numeric at all.
pub fn numeric_bounds(lower: &Bound, upper: &Bound) -> Option<Option<(i64, i64)>> {
    if matches!((lower, upper), (Bound::Unbounded, Bound::Unbounded)) {
        return None;
    }

    let lo = match lower {
        Bound::Unbounded => Some(i64::MIN),
        Bound::Inclusive(v) => Some(v.parse::<i64>().ok()?),
        Bound::Exclusive(v) => v.parse::<i64>().ok()?.checked_add(1),
    };
    let hi = match upper {
        Bound::Unbounded => Some(i64::MAX),
        Bound::Inclusive(v) => Some(v.parse::<i64>().ok()?),
        Bound::Exclusive(v) => v.parse::<i64>().ok()?.checked_sub(1),
    };

    Some(match (lo, hi) {
        (Some(lo), Some(hi)) if lo <= hi => Some((lo, hi)),
        _ => None,
    })
}
