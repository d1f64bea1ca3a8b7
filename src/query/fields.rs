// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Which record fields does a query need?
//!
//! Only the paths named in the clause tree are projected out of records, so
//! a query over `name` never pays for indexing `attributeReleasePolicy`.

use super::Clause;
use crate::types::{FieldPath, FieldSet};

/// Collect the field paths a clause tree references, in first-seen order.
///
/// Regexp clauses contribute their field with the exact-match marker so the
/// projector indexes the whole value as one term. Boolean children are
/// visited regardless of occurrence: a `MustNot` child still has to be
/// evaluable.
pub fn discover_fields(clause: &Clause) -> FieldSet {
    let mut fields = FieldSet::new();
    collect(clause, &mut fields);
    fields
}

fn collect(clause: &Clause, fields: &mut FieldSet) {
    match clause {
        Clause::Term { field, .. }
        | Clause::Phrase { field, .. }
        | Clause::Wildcard { field, .. }
        | Clause::Range { field, .. } => {
            fields.insert(FieldPath::new(field.as_str()));
        }
        Clause::Regexp { field, .. } => {
            fields.insert(FieldPath::exact(field));
        }
        Clause::Boolean(children) => {
            for (_, child) in children {
                collect(child, fields);
            }
        }
    }
}
