// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! One search call, end to end.
//!
//! ```text
//! query ──parse──▶ Clause ──discover──▶ FieldSet
//!                                          │
//! source ──all_records──▶ can_see? ──project┘──▶ IndexDocument*
//!                                                   │
//!                          call dir ◀──write── build_index
//!                             │
//!                           open ──search──▶ IndexHit* ──find_by_id──▶ ServiceItem*
//! ```
//!
//! Nothing survives the call: the index directory is released on every path
//! out of [`SearchService::search_report`], including early `?` returns.

use crate::config::SearchConfig;
use crate::error::{IndexIoError, SearchError};
use crate::index::{build_index, IndexStorage};
use crate::project::project;
use crate::query::{discover_fields, parse};
use crate::source::{Caller, RecordSource, ServiceItem};
use crate::types::{IndexDocument, IndexHit, MISSING_ID};
use crate::MAX_RESULTS;
use tracing::{error, info, warn};

/// The outcome of a search, keeping the reason a search came back empty.
#[derive(Debug)]
pub struct SearchReport {
    pub items: Vec<ServiceItem>,
    /// Set when a syntax or index error was swallowed into an empty result.
    pub degraded: Option<SearchError>,
}

impl SearchReport {
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Runs queries over a record source.
///
/// Holds no per-search state, so one service can be shared across threads
/// when its source allows it.
#[derive(Debug)]
pub struct SearchService<S> {
    source: S,
    config: SearchConfig,
}

impl<S: RecordSource> SearchService<S> {
    pub fn new(source: S, config: SearchConfig) -> Self {
        Self { source, config }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Matching records the caller may see, best first.
    ///
    /// Malformed queries and index read failures yield an empty list (and an
    /// error log). Source and index build failures are returned.
    pub fn search(
        &self,
        caller: &dyn Caller,
        query: &str,
    ) -> Result<Vec<ServiceItem>, SearchError> {
        self.search_report(caller, query).map(|report| report.items)
    }

    /// Like [`search`](Self::search), but reports a degraded outcome.
    pub fn search_report(
        &self,
        caller: &dyn Caller,
        query: &str,
    ) -> Result<SearchReport, SearchError> {
        match self.run(caller, query) {
            Ok(items) => Ok(SearchReport {
                items,
                degraded: None,
            }),
            Err(e) if e.is_degradable() => Ok(degrade(caller.username(), query, e)),
            Err(e) => Err(e),
        }
    }

    /// The result limit for one call. Config can lower it, never raise it.
    pub fn result_limit(&self) -> usize {
        self.config.max_results.min(MAX_RESULTS)
    }

    fn run(&self, caller: &dyn Caller, query: &str) -> Result<Vec<ServiceItem>, SearchError> {
        let username = caller.username();

        let clause = parse(query)?;
        let fields = discover_fields(&clause);

        let records = self.source.all_records()?;
        let total = records.len();
        let documents: Vec<IndexDocument> = records
            .iter()
            .filter(|record| caller.can_see(record))
            .map(|record| project(record, &fields))
            .collect();
        drop(records);

        let storage = IndexStorage::acquire(&self.config.index_root, username)?;
        storage.write(&build_index(&documents))?;

        let hits = storage
            .open()
            .and_then(|handle| handle.search(&clause, self.result_limit()));
        storage.release();
        let hits = hits?;

        let matched = hits.len();
        let items: Vec<ServiceItem> = hits
            .into_iter()
            .filter_map(|hit| self.pull(caller, hit))
            .collect();

        info!(
            user = username,
            query,
            records = total,
            visible = documents.len(),
            matched,
            returned = items.len(),
            "search complete"
        );

        Ok(items)
    }

    /// Turn a hit back into a caller-facing item, or skip it.
    ///
    /// The pulled record is checked against the caller again: an id lookup
    /// can land on a different record than the one indexed.
    fn pull(&self, caller: &dyn Caller, hit: IndexHit) -> Option<ServiceItem> {
        let id = match hit.id {
            Some(id) if id != MISSING_ID => id,
            _ => {
                let e = IndexIoError::UnknownDocument { ordinal: hit.doc.0 };
                warn!(error = %e, "skipping hit without a record id");
                return None;
            }
        };

        match self.source.find_by_id(id) {
            Some(record) if caller.can_see(&record) => Some(self.source.summarize(&record)),
            Some(_) => {
                warn!(id, "matched id resolves to a hidden record; skipping hit");
                None
            }
            None => {
                warn!(id, "matched record is no longer in the source; skipping hit");
                None
            }
        }
    }
}

fn degrade(username: &str, query: &str, e: SearchError) -> SearchReport {
    error!(user = username, query, error = %e, "search failed; returning no results");
    SearchReport {
        items: Vec::new(),
        degraded: Some(e),
    }
}
