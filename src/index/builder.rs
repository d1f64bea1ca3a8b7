// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Building the in-memory index from projected documents.
//!
//! Documents get dense ordinals in insertion order. Because ordinals only ever
//! grow, appending a posting keeps every list sorted without a final sort.

use crate::analysis::tokenize;
use crate::types::{
    DocOrd, EphemeralIndex, FieldIndex, FieldKind, IndexDocument, Posting, PostingList,
};
use std::collections::HashMap;

/// Accumulates documents into an [`EphemeralIndex`].
#[derive(Debug, Default)]
pub struct IndexBuilder {
    ids: Vec<i64>,
    fields: HashMap<String, FieldIndex>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one document and return its ordinal.
    pub fn add(&mut self, doc: &IndexDocument) -> DocOrd {
        let ord = DocOrd(self.ids.len() as u32);
        self.ids.push(doc.id);

        for field in &doc.fields {
            let index = self.fields.entry(field.name.clone()).or_default();

            match field.kind {
                FieldKind::Exact => add_position(index, &field.value, ord, 0),
                FieldKind::Text => {
                    if index.lengths.len() <= ord.as_usize() {
                        index.lengths.resize(ord.as_usize() + 1, 0);
                    }
                    // A second text value in the same field continues after the first.
                    let base = index.lengths[ord.as_usize()];
                    let tokens = tokenize(&field.value);
                    for token in &tokens {
                        add_position(index, &token.term, ord, base + token.position);
                    }
                    index.lengths[ord.as_usize()] += tokens.len() as u32;
                }
                FieldKind::Numeric => {
                    if let Some(point) = field.point {
                        index.points.push((point, ord));
                    }
                }
            }
        }

        ord
    }

    pub fn doc_count(&self) -> usize {
        self.ids.len()
    }

    /// Finish: pad lengths, dedupe positions, fill in document frequencies, sort points.
    pub fn finish(self) -> EphemeralIndex {
        let doc_count = self.ids.len();
        let mut fields = self.fields;

        for index in fields.values_mut() {
            index.lengths.resize(doc_count, 0);
            index.total_length = index.lengths.iter().map(|&l| u64::from(l)).sum();
            index.length_docs = index.lengths.iter().filter(|&&l| l > 0).count() as u32;

            for list in index.terms.values_mut() {
                for posting in &mut list.postings {
                    // An exact value and its own text token can both sit at 0.
                    posting.positions.sort_unstable();
                    posting.positions.dedup();
                }
                list.doc_freq = list.postings.len();
            }

            index.points.sort_unstable();
        }

        EphemeralIndex {
            ids: self.ids,
            fields,
        }
    }
}

/// Build an index over `documents`, ordinals following slice order.
pub fn build_index(documents: &[IndexDocument]) -> EphemeralIndex {
    let mut builder = IndexBuilder::new();
    for doc in documents {
        builder.add(doc);
    }
    builder.finish()
}

fn add_position(index: &mut FieldIndex, term: &str, ord: DocOrd, position: u32) {
    let list: &mut PostingList = index.terms.entry(term.to_string()).or_default();
    match list.postings.last_mut() {
        Some(posting) if posting.doc == ord => posting.positions.push(position),
        _ => list.postings.push(Posting {
            doc: ord,
            positions: vec![position],
        }),
    }
}

/// Check the structural invariants of a built index:
/// - every posting list is strictly ascending by ordinal with `doc_freq == len`
/// - every ordinal is in range
/// - points are sorted
/// - lengths cover every document
pub fn is_well_formed(index: &EphemeralIndex) -> bool {
    let doc_count = index.doc_count();

    index.fields.values().all(|field| {
        let postings_ok = field.terms.values().all(|list| {
            list.doc_freq == list.postings.len()
                && list.postings.windows(2).all(|w| w[0].doc < w[1].doc)
                && list
                    .postings
                    .iter()
                    .all(|p| p.doc.as_usize() < doc_count && !p.positions.is_empty())
        });
        let points_ok = field.points.windows(2).all(|w| w[0] <= w[1])
            && field.points.iter().all(|(_, d)| d.as_usize() < doc_count);

        postings_ok && points_ok && field.lengths.len() == doc_count
    })
}
