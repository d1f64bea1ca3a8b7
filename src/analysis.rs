// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Text analysis shared by indexing and query parsing.
//!
//! Both sides must agree exactly, otherwise a query term can never meet the
//! token it was meant to find. The rules:
//!
//! 1. Split on every non-alphanumeric character.
//! 2. Normalize each word (lowercase, diacritics stripped).
//! 3. Drop empty words.
//!
//! No stop words are removed. Configuration values like `and`, `or` and `not`
//! are legitimate things to search for in a service registry.

use crate::utils::normalize;

/// Word boundary detection: checks if character is a word separator.
#[inline]
fn is_word_boundary(c: char) -> bool {
    !c.is_alphanumeric()
}

/// A normalized word and its token position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    /// Ordinal among the tokens of the same text, starting at 0.
    pub position: u32,
}

/// Tokenize text into normalized words with consecutive positions.
///
/// Positions count tokens, not bytes, so phrase matching only has to check
/// `position + 1`.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut position = 0u32;

    for word in text.split(is_word_boundary) {
        if word.is_empty() {
            continue;
        }
        let normalized = normalize(word);
        if normalized.is_empty() {
            continue;
        }
        // Normalization can expand a word ("ß" → "ss"), but never splits it.
        tokens.push(Token {
            term: normalized,
            position,
        });
        position += 1;
    }

    tokens
}

/// Just the terms of [`tokenize`].
pub fn analyze(text: &str) -> Vec<String> {
    tokenize(text).into_iter().map(|t| t.term).collect()
}
