// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a query-scoped index.
//!
//! These types describe how a record turns into index fields and how those
//! fields are laid out once indexed. Everything here lives for exactly one
//! search call.
//!
//! | Rust Type        | Purpose                                          |
//! |------------------|--------------------------------------------------|
//! | `Record`         | Raw service registration (schema-less JSON)      |
//! | `FieldPath`      | Dotted path, optionally exact-match marked       |
//! | `TypedValue`     | Value resolved out of a record                   |
//! | `IndexField`     | One emitted field: name + kind + value           |
//! | `IndexDocument`  | A record restricted to the queried fields        |
//! | `PostingList`    | Documents (and positions) containing a term      |
//!
//! # Invariants
//!
//! - **IndexDocument**: carries exactly one stored `id`; `id` is never tokenized.
//! - **PostingList**: postings sorted by ordinal, `doc_freq == postings.len()`.
//! - **FieldIndex**: `points` sorted by `(value, ordinal)`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A service registration: any JSON value, expected to be an object with an
/// integer `id`.
pub type Record = serde_json::Value;

/// Name of the catch-all full-text field.
pub const BODY_FIELD: &str = "body";

/// Name of the stored identifier field.
pub const ID_FIELD: &str = "id";

/// Suffix marking a path for exact-term (regular expression) matching.
pub const EXACT_MARKER: &str = "-reg";

/// Id assigned to records without a usable integer `id`.
pub const MISSING_ID: i64 = -1;

// =============================================================================
// NEWTYPES
// =============================================================================

/// Position of a document inside one ephemeral index.
///
/// Ordinals are dense (`0..doc_count`) and only meaningful for the index that
/// issued them. Record ids are a different thing; see [`IndexDocument::id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DocOrd(pub u32);

impl DocOrd {
    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocOrd {
    fn from(ordinal: u32) -> Self {
        DocOrd(ordinal)
    }
}

// =============================================================================
// FIELD PATHS
// =============================================================================

/// A dotted path into a record, e.g. `accessStrategy.enabled`.
///
/// A path ending in `-reg` asks for the value to be indexed as one untokenized
/// term under the unmarked name, so regular expressions see the whole value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(path: impl Into<String>) -> Self {
        FieldPath(path.into())
    }

    /// Path of a regexp clause over `field`.
    pub fn exact(field: &str) -> Self {
        FieldPath(format!("{field}{EXACT_MARKER}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the path carries the exact-match marker.
    pub fn is_exact(&self) -> bool {
        self.0.ends_with(EXACT_MARKER)
    }

    /// The path without the exact-match marker.
    pub fn unmarked(&self) -> &str {
        self.0.strip_suffix(EXACT_MARKER).unwrap_or(&self.0)
    }

    /// Key segments of the unmarked path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.unmarked().split('.')
    }

    pub fn is_body(&self) -> bool {
        self.0 == BODY_FIELD
    }

    pub fn is_id(&self) -> bool {
        self.unmarked() == ID_FIELD
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath::new(path)
    }
}

/// Insertion-ordered set of distinct field paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    paths: Vec<FieldPath>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path; returns false if it was already present.
    pub fn insert(&mut self, path: FieldPath) -> bool {
        if self.paths.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p.as_str() == path)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldPath> {
        self.paths.iter()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a FieldPath;
    type IntoIter = std::slice::Iter<'a, FieldPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl FromIterator<FieldPath> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldPath>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

// =============================================================================
// VALUES AND FIELDS
// =============================================================================

/// A value resolved out of a record.
///
/// Arrays and objects are kept as their serialized JSON text: they only ever
/// take part in matching as full-text blobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    String(String),
    Number(i64),
    Boolean(bool),
    Array(String),
    Object(String),
    Null,
}

/// How an index field is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// One untokenized term.
    Exact,
    /// Analyzed into positional tokens.
    Text,
    /// Range-queryable integer point.
    Numeric,
}

/// One field emitted for an index document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexField {
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
    /// Set only for `FieldKind::Numeric`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<i64>,
}

impl IndexField {
    pub fn exact(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Exact,
            value: value.into(),
            point: None,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
            value: value.into(),
            point: None,
        }
    }

    pub fn numeric(name: impl Into<String>, point: i64) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Numeric,
            value: point.to_string(),
            point: Some(point),
        }
    }
}

/// A record reduced to the fields a query needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Stored record identifier.
    pub id: i64,
    pub fields: Vec<IndexField>,
}

impl IndexDocument {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            fields: Vec::new(),
        }
    }

    pub fn add(&mut self, field: IndexField) {
        self.fields.push(field);
    }

    /// Fields with the given name, in emission order.
    pub fn fields_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a IndexField> + 'a {
        self.fields.iter().filter(move |f| f.name == name)
    }
}

// =============================================================================
// POSTINGS
// =============================================================================

/// Occurrences of a term within one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub doc: DocOrd,
    /// Token positions; a single `0` for exact terms.
    pub positions: Vec<u32>,
}

impl Posting {
    #[inline]
    pub fn freq(&self) -> usize {
        self.positions.len()
    }
}

/// All postings for one term in one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    pub postings: Vec<Posting>,
    pub doc_freq: usize,
}

/// Everything indexed under one field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldIndex {
    /// Term dictionary. Sorted, so term scans are deterministic.
    pub terms: BTreeMap<String, PostingList>,
    /// Numeric points sorted by value, then ordinal.
    pub points: Vec<(i64, DocOrd)>,
    /// Token count per ordinal; 0 where the document has no text here.
    pub lengths: Vec<u32>,
    /// Sum of `lengths`.
    pub total_length: u64,
    /// Documents with a non-zero length.
    pub length_docs: u32,
}

impl FieldIndex {
    /// Average token count over documents that have this field.
    pub fn average_length(&self) -> f64 {
        if self.length_docs == 0 {
            1.0
        } else {
            self.total_length as f64 / f64::from(self.length_docs)
        }
    }

    /// Token count of one document; exact-only documents count as 1.
    pub fn length_of(&self, doc: DocOrd) -> u32 {
        match self.lengths.get(doc.as_usize()) {
            Some(&len) if len > 0 => len,
            _ => 1,
        }
    }
}

/// The searchable form of one query's worth of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EphemeralIndex {
    /// Stored ids, indexed by ordinal.
    pub ids: Vec<i64>,
    pub fields: HashMap<String, FieldIndex>,
}

impl EphemeralIndex {
    pub fn doc_count(&self) -> usize {
        self.ids.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldIndex> {
        self.fields.get(name)
    }

    /// Stored record id for an ordinal.
    pub fn stored_id(&self, doc: DocOrd) -> Option<i64> {
        self.ids.get(doc.as_usize()).copied()
    }
}

/// One ranked match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredHit {
    pub doc: DocOrd,
    pub score: f64,
}

/// A ranked match with its stored record id pulled out of the index.
///
/// `id` is `None` when the ordinal has no stored id; callers skip such hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexHit {
    pub doc: DocOrd,
    pub score: f64,
    pub id: Option<i64>,
}
