// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit tests, integration tests and benches.
//!
//! This module is always compiled but hidden from documentation.

#![doc(hidden)]

use crate::config::SearchConfig;
use crate::error::{QuerySyntaxError, SearchError};
use crate::index::{build_index, IndexHandle, IndexStorage};
use crate::orchestrator::SearchService;
use crate::project::project;
use crate::query::{discover_fields, parse};
use crate::source::{Caller, MemorySource};
use crate::types::{EphemeralIndex, Record};
use serde_json::json;
use std::path::Path;

/// Create a service registration with the usual top-level keys.
pub fn make_service(id: i64, name: &str, service_id: &str) -> Record {
    json!({
        "@class": "org.apereo.cas.services.CasRegisteredService",
        "id": id,
        "name": name,
        "serviceId": service_id,
        "description": format!("Description of {name}"),
        "evalOrder": id,
    })
}

/// Create an OAuth registration with a client secret expiration.
pub fn make_oauth_service(id: i64, name: &str, expiration: i64, enabled: bool) -> Record {
    json!({
        "@class": "org.apereo.cas.support.oauth.services.OAuthRegisteredService",
        "id": id,
        "name": name,
        "serviceId": format!("https://{}.example.org/.*", name.to_lowercase()),
        "type": "oauth",
        "enabled": enabled,
        "clientSecretExpiration": expiration,
        "evalOrder": id,
    })
}

/// Create a registration whose attribute release policy has the given type.
pub fn make_service_with_policy(id: i64, name: &str, policy_type: &str) -> Record {
    json!({
        "@class": "org.apereo.cas.services.CasRegisteredService",
        "id": id,
        "name": name,
        "serviceId": format!("https://{}.example.org/.*", name.to_lowercase()),
        "attributeReleasePolicy": { "type": policy_type },
    })
}

/// Build an in-memory index for `query` over `records`, the way a search call
/// would.
pub fn index_for(query: &str, records: &[Record]) -> Result<EphemeralIndex, QuerySyntaxError> {
    let clause = parse(query)?;
    let fields = discover_fields(&clause);
    let docs: Vec<_> = records.iter().map(|r| project(r, &fields)).collect();
    Ok(build_index(&docs))
}

/// Write `index` into fresh storage under `root` and open it.
pub fn stored_handle(
    root: &Path,
    index: &EphemeralIndex,
) -> Result<(IndexStorage, IndexHandle), SearchError> {
    let storage = IndexStorage::acquire(root, "tester")?;
    storage.write(index)?;
    let handle = storage.open()?;
    Ok((storage, handle))
}

/// A search service over `records` with its index root under `root`.
pub fn make_search_service(root: &Path, records: Vec<Record>) -> SearchService<MemorySource> {
    SearchService::new(
        MemorySource::new(records),
        SearchConfig::default().with_index_root(root),
    )
}

/// A caller that sees only records whose id is in `visible`.
#[derive(Debug, Clone)]
pub struct IdCaller {
    pub name: String,
    pub visible: Vec<i64>,
}

impl Caller for IdCaller {
    fn username(&self) -> &str {
        &self.name
    }

    fn can_see(&self, record: &Record) -> bool {
        record
            .get("id")
            .and_then(serde_json::Value::as_i64)
            .is_some_and(|id| self.visible.contains(&id))
    }
}
