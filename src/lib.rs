// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query-scoped full-text search over schema-less service registrations.
//!
//! Records have no fixed schema, so there is no standing index. Each search
//! builds a throwaway one containing only the fields its query mentions, runs
//! the query once, and deletes it.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌─────────────┐    ┌────────────┐    ┌─────────────┐
//! │  query/    │───▶│ project.rs  │───▶│  index/    │───▶│  search/    │
//! │ (parse,    │    │ (resolve,   │    │ (builder,  │    │ (evaluate,  │
//! │  discover) │    │  project)   │    │  storage)  │    │  matchers)  │
//! └────────────┘    └─────────────┘    └────────────┘    └─────────────┘
//!        ▲                                                      │
//!        │            ┌───────────────────┐                     │
//!        └────────────│  orchestrator.rs  │◀────────────────────┘
//!                     │  (SearchService)  │
//!                     └───────────────────┘
//!                              ▲
//!                   source.rs (RecordSource, Caller)
//! ```
//!
//! # Query language
//!
//! | Syntax                     | Meaning                                        |
//! |----------------------------|------------------------------------------------|
//! | `cas client`               | either word anywhere in the record (`body`)    |
//! | `name:portal`              | analyzed term in one field                     |
//! | `accessStrategy.enabled:x` | nested field                                   |
//! | `description:"sign on"`    | phrase                                         |
//! | `name:CAS*`                | wildcard (`*`, `?`)                            |
//! | `name:/CAS.*/`             | regular expression over the whole raw value    |
//! | `evalOrder:[1 TO 10}`      | range, numeric when both ends are integers     |
//! | `a AND b`, `+a -b`, `NOT a`| boolean operators                              |
//!
//! # Usage
//!
//! ```
//! use regsearch::{MemorySource, SearchConfig, SearchService, UserProfile};
//! use serde_json::json;
//!
//! let root = tempfile::tempdir().unwrap();
//! let service = SearchService::new(
//!     MemorySource::new(vec![
//!         json!({"id": 1, "name": "CAS Client", "serviceId": "https://cas.example.org"}),
//!         json!({"id": 2, "name": "Wiki", "serviceId": "https://wiki.example.org"}),
//!     ]),
//!     SearchConfig::default().with_index_root(root.path()),
//! );
//!
//! let items = service
//!     .search(&UserProfile::unrestricted("casuser"), "name:/CAS.*/")
//!     .unwrap();
//! assert_eq!(items.len(), 1);
//! assert_eq!(items[0].name, "CAS Client");
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod index;
pub mod orchestrator;
pub mod project;
pub mod query;
pub mod scoring;
pub mod search;
pub mod source;
pub mod testing;
pub mod types;
mod utils;

/// Most results a single search returns.
pub const MAX_RESULTS: usize = 5_000;

// Re-exports for public API
pub use analysis::{analyze, tokenize, Token};
pub use config::SearchConfig;
pub use error::{
    ConfigError, IndexBuildError, IndexIoError, QuerySyntaxError, SearchError, SourceError,
};
pub use index::{build_index, IndexBuilder, IndexHandle, IndexStorage};
pub use orchestrator::{SearchReport, SearchService};
pub use project::{project, resolve};
pub use query::{discover_fields, parse, Bound, Clause, Occur, QueryParser};
pub use search::evaluate;
pub use source::{Caller, JsonFileSource, MemorySource, RecordSource, ServiceItem, UserProfile};
pub use types::{
    DocOrd, EphemeralIndex, FieldKind, FieldPath, FieldSet, IndexDocument, IndexField, IndexHit,
    Record, ScoredHit, TypedValue,
};
pub use utils::{normalize, sanitize_component};
