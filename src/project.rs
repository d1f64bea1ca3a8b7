// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Record projection: from a schema-less record to the fields one query needs.
//!
//! Each discovered path is resolved through nested objects and emitted with a
//! strategy picked by the value's type:
//!
//! | Value                  | Emitted                                     |
//! |------------------------|---------------------------------------------|
//! | number                 | numeric point + exact term, same name       |
//! | boolean, array, object | one text field over the serialized form     |
//! | string, `-reg` path    | one exact term under the unmarked name      |
//! | string                 | one text field                              |
//! | missing / null         | nothing                                     |
//!
//! `body` is not a record key: it stands for the whole record, and also pulls
//! in the well-known policy sub-objects as their own text fields.

use crate::types::{
    FieldPath, FieldSet, IndexDocument, IndexField, Record, TypedValue, BODY_FIELD, ID_FIELD,
    MISSING_ID,
};
use serde_json::Value;
use tracing::debug;

/// Sub-objects indexed as text alongside `body`, so `attributeReleasePolicy:allow`
/// works whenever the query also searches the body.
pub const AUXILIARY_FIELDS: [&str; 6] = [
    "attributeReleasePolicy",
    "accessStrategy",
    "multifactorPolicy",
    "contacts",
    "usernameAttributeProvider",
    "acceptableUsagePolicy",
];

/// Resolve a dotted path against a record.
///
/// Missing keys, explicit nulls, and non-object intermediates all yield
/// [`TypedValue::Null`].
pub fn resolve(record: &Record, path: &FieldPath) -> TypedValue {
    let mut current = record;
    for segment in path.segments() {
        match current.as_object().and_then(|object| object.get(segment)) {
            Some(next) => current = next,
            None => return TypedValue::Null,
        }
    }
    typed(current)
}

/// Classify one JSON value.
pub fn typed(value: &Value) -> TypedValue {
    match value {
        Value::Null => TypedValue::Null,
        Value::Bool(b) => TypedValue::Boolean(*b),
        Value::Number(n) => TypedValue::Number(number_to_i64(n)),
        Value::String(s) => TypedValue::String(s.clone()),
        Value::Array(_) => TypedValue::Array(value.to_string()),
        Value::Object(_) => TypedValue::Object(value.to_string()),
    }
}

/// Integer view of a JSON number. Floats truncate toward zero; values out of
/// range saturate.
fn number_to_i64(n: &serde_json::Number) -> i64 {
    if let Some(i) = n.as_i64() {
        i
    } else if n.as_u64().is_some() {
        i64::MAX
    } else {
        // `as` saturates and maps NaN to 0.
        n.as_f64().map(|f| f.trunc() as i64).unwrap_or_default()
    }
}

/// The record's integer `id`, or [`MISSING_ID`].
pub fn record_id(record: &Record) -> i64 {
    match record.get(ID_FIELD).and_then(Value::as_i64) {
        Some(id) => id,
        None => {
            debug!(record = %record, "record has no integer id; indexing as {MISSING_ID}");
            MISSING_ID
        }
    }
}

/// Build the index document for one record.
pub fn project(record: &Record, fields: &FieldSet) -> IndexDocument {
    let id = record_id(record);
    let mut doc = IndexDocument::new(id);

    doc.add(IndexField::exact(ID_FIELD, id.to_string()));
    doc.add(IndexField::numeric(ID_FIELD, id));

    for path in fields {
        if path.is_id() {
            continue;
        }
        if path.is_body() {
            project_body(record, fields, &mut doc);
            continue;
        }
        emit(&mut doc, path, resolve(record, path));
    }

    debug!(id, fields = doc.fields.len(), "projected record");
    doc
}

fn project_body(record: &Record, fields: &FieldSet, doc: &mut IndexDocument) {
    doc.add(IndexField::text(BODY_FIELD, record.to_string()));

    for name in AUXILIARY_FIELDS {
        // An explicit path for the same name is projected on its own.
        if fields.contains(name) {
            continue;
        }
        if let Some(value) = record.get(name).filter(|v| !v.is_null()) {
            doc.add(IndexField::text(name, value.to_string()));
        }
    }
}

fn emit(doc: &mut IndexDocument, path: &FieldPath, value: TypedValue) {
    let name = path.unmarked();
    match value {
        TypedValue::Number(n) => {
            doc.add(IndexField::numeric(name, n));
            doc.add(IndexField::exact(name, n.to_string()));
        }
        TypedValue::Boolean(b) => doc.add(IndexField::text(name, b.to_string())),
        TypedValue::Array(s) | TypedValue::Object(s) => doc.add(IndexField::text(name, s)),
        TypedValue::String(s) if path.is_exact() => doc.add(IndexField::exact(name, s)),
        TypedValue::String(s) => doc.add(IndexField::text(name, s)),
        TypedValue::Null => {}
    }
}
