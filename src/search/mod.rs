// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query evaluation: clause tree in, ranked ordinals out.
//!
//! Single-term clauses (terms, phrases) use postings and BM25. Multi-term
//! clauses (wildcards, regexps, ranges) expand over the field's term dictionary
//! through a [`TermMatcher`](matchers::TermMatcher) and score a flat constant.

mod evaluator;
pub mod matchers;

pub use evaluator::evaluate;
