// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query strings and the clause trees they parse into.
//!
//! The clause kinds are a closed set. Everything downstream (field discovery,
//! evaluation, display) is a single `match` over [`Clause`].
//!
//! ```text
//! "type:oauth AND NOT enabled:false"
//!
//!   Boolean
//!   ├── Must     Term(type, "oauth")
//!   └── MustNot  Term(enabled, "false")
//! ```

mod fields;
mod parser;

pub use fields::discover_fields;
pub use parser::{parse, QueryParser};

use std::fmt;

/// How a boolean child takes part in matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occur {
    /// Required. Contributes to the score.
    Must,
    /// Optional. Contributes to the score; at least one is required when
    /// there is no `Must` sibling.
    Should,
    /// Excludes every matching document.
    MustNot,
}

/// One end of a range clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Unbounded,
    Inclusive(String),
    Exclusive(String),
}

impl Bound {
    /// The bound's text, if it has one.
    pub fn value(&self) -> Option<&str> {
        match self {
            Bound::Unbounded => None,
            Bound::Inclusive(v) | Bound::Exclusive(v) => Some(v),
        }
    }
}

/// A parsed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// A single analyzed token.
    Term { field: String, text: String },
    /// Analyzed tokens that must appear at consecutive positions.
    Phrase { field: String, terms: Vec<String> },
    /// `*` and `?` pattern over the field's terms. Backslash escapes.
    Wildcard { field: String, pattern: String },
    /// Regular expression over the field's terms, anchored at both ends.
    Regexp { field: String, pattern: String },
    Range {
        field: String,
        lower: Bound,
        upper: Bound,
    },
    Boolean(Vec<(Occur, Clause)>),
}

impl Clause {
    pub fn term(field: impl Into<String>, text: impl Into<String>) -> Self {
        Clause::Term {
            field: field.into(),
            text: text.into(),
        }
    }

    /// The field a leaf clause targets; `None` for booleans.
    pub fn field(&self) -> Option<&str> {
        match self {
            Clause::Term { field, .. }
            | Clause::Phrase { field, .. }
            | Clause::Wildcard { field, .. }
            | Clause::Regexp { field, .. }
            | Clause::Range { field, .. } => Some(field),
            Clause::Boolean(_) => None,
        }
    }

    /// An empty boolean. Matches nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Clause::Boolean(children) if children.is_empty())
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Term { field, text } => write!(f, "{field}:{text}"),
            Clause::Phrase { field, terms } => write!(f, "{field}:\"{}\"", terms.join(" ")),
            Clause::Wildcard { field, pattern } => write!(f, "{field}:{pattern}"),
            Clause::Regexp { field, pattern } => write!(f, "{field}:/{pattern}/"),
            Clause::Range { field, lower, upper } => {
                let (open, lo) = match lower {
                    Bound::Unbounded => ('[', "*"),
                    Bound::Inclusive(v) => ('[', v.as_str()),
                    Bound::Exclusive(v) => ('{', v.as_str()),
                };
                let (close, hi) = match upper {
                    Bound::Unbounded => (']', "*"),
                    Bound::Inclusive(v) => (']', v.as_str()),
                    Bound::Exclusive(v) => ('}', v.as_str()),
                };
                write!(f, "{field}:{open}{lo} TO {hi}{close}")
            }
            Clause::Boolean(children) => {
                f.write_str("(")?;
                for (i, (occur, child)) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    match occur {
                        Occur::Must => f.write_str("+")?,
                        Occur::MustNot => f.write_str("-")?,
                        Occur::Should => {}
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")
            }
        }
    }
}
