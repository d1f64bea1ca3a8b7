// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Collaborators at the edge of the engine: where records come from, who is
//! asking, and what a match looks like to them.

use crate::error::SourceError;
use crate::project::record_id;
use crate::types::Record;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// TRAITS
// =============================================================================

/// Supplies the records a search runs over.
pub trait RecordSource {
    /// Every record, visible or not. Filtering is the engine's job.
    fn all_records(&self) -> Result<Vec<Record>, SourceError>;

    /// Look one record up by its `id`.
    fn find_by_id(&self, id: i64) -> Option<Record>;

    /// Caller-facing summary of a record.
    fn summarize(&self, record: &Record) -> ServiceItem {
        ServiceItem::from_record(record)
    }
}

/// The identity a search runs as.
pub trait Caller {
    fn username(&self) -> &str;

    /// Whether this caller may see `record` at all.
    fn can_see(&self, record: &Record) -> bool;
}

// =============================================================================
// SERVICE ITEM
// =============================================================================

/// Summary of a matching service registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceItem {
    pub assigned_id: String,
    pub eval_order: i64,
    pub name: String,
    pub service_id: String,
    pub description: String,
    /// Last segment of the record's `@class`, e.g. `CasRegisteredService`.
    pub service_type: String,
}

impl ServiceItem {
    pub fn from_record(record: &Record) -> Self {
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let class = text("@class");
        let service_type = class.rsplit('.').next().unwrap_or_default().to_string();

        Self {
            assigned_id: record_id(record).to_string(),
            eval_order: record
                .get("evalOrder")
                .and_then(Value::as_i64)
                .unwrap_or_default(),
            name: text("name"),
            service_id: text("serviceId"),
            description: text("description"),
            service_type,
        }
    }
}

// =============================================================================
// SOURCES
// =============================================================================

/// Records held in memory, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Record>,
    by_id: HashMap<i64, usize>,
}

impl MemorySource {
    pub fn new(records: Vec<Record>) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(i, r)| (record_id(r), i))
            .collect();
        Self { records, by_id }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for MemorySource {
    fn all_records(&self) -> Result<Vec<Record>, SourceError> {
        Ok(self.records.clone())
    }

    fn find_by_id(&self, id: i64) -> Option<Record> {
        self.by_id.get(&id).map(|&i| self.records[i].clone())
    }
}

/// Records loaded from a file holding one JSON array of objects.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    inner: MemorySource,
}

impl JsonFileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;

        let records = match serde_json::from_str::<Value>(&text)? {
            Value::Array(items) if items.iter().all(Value::is_object) => items,
            _ => return Err(SourceError::NotAnArray),
        };

        Ok(Self {
            path,
            inner: MemorySource::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn all_records(&self) -> Result<Vec<Record>, SourceError> {
        self.inner.all_records()
    }

    fn find_by_id(&self, id: i64) -> Option<Record> {
        self.inner.find_by_id(id)
    }
}

// =============================================================================
// CALLERS
// =============================================================================

/// A user and the service ids they may manage.
///
/// Patterns are regular expressions over `serviceId`, matched against the
/// whole value. No patterns, or a bare `*`, means every record is visible.
#[derive(Debug, Clone)]
pub struct UserProfile {
    username: String,
    allowed: Option<Vec<Regex>>,
}

impl UserProfile {
    /// A user who can see everything.
    pub fn unrestricted(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            allowed: None,
        }
    }

    pub fn with_patterns<S: AsRef<str>>(
        username: impl Into<String>,
        patterns: &[S],
    ) -> Result<Self, regex::Error> {
        if patterns.is_empty() || patterns.iter().any(|p| p.as_ref() == "*") {
            return Ok(Self::unrestricted(username));
        }

        let allowed = patterns
            .iter()
            .map(|p| Regex::new(&format!("^(?:{})$", p.as_ref())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            username: username.into(),
            allowed: Some(allowed),
        })
    }
}

impl Caller for UserProfile {
    fn username(&self) -> &str {
        &self.username
    }

    fn can_see(&self, record: &Record) -> bool {
        let Some(allowed) = &self.allowed else {
            return true;
        };
        let service_id = record
            .get("serviceId")
            .and_then(Value::as_str)
            .unwrap_or_default();
        allowed.iter().any(|rx| rx.is_match(service_id))
    }
}
