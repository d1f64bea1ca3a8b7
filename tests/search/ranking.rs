// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Result ordering and the result cap.

use super::common::{index_root, make_search_service, search_ids};
use regsearch::{
    evaluate, parse, testing::index_for, MemorySource, SearchConfig, SearchService, MAX_RESULTS,
};
use serde_json::json;

#[test]
fn test_results_capped_at_max() {
    let root = index_root();
    let records = (0..MAX_RESULTS as i64 + 100)
        .map(|i| json!({"id": i, "name": "portal"}))
        .collect();
    let service = make_search_service(root.path(), records);

    let ids = search_ids(&service, "name:portal");
    assert_eq!(ids.len(), MAX_RESULTS);

    // Equal scores fall back to insertion order.
    assert_eq!(ids[0], "0");
    assert_eq!(ids[MAX_RESULTS - 1], (MAX_RESULTS - 1).to_string());
}

#[test]
fn test_config_cannot_raise_cap() {
    let root = index_root();
    let records = (0..MAX_RESULTS as i64 + 50)
        .map(|i| json!({"id": i, "name": "same"}))
        .collect();
    let service = SearchService::new(
        MemorySource::new(records),
        SearchConfig::default()
            .with_index_root(root.path())
            .with_max_results(MAX_RESULTS + 50),
    );

    assert_eq!(search_ids(&service, "name:same").len(), MAX_RESULTS);
}

#[test]
fn test_scores_never_increase() {
    let records: Vec<_> = (0..MAX_RESULTS as i64 + 100)
        .map(|i| {
            let padding = " filler".repeat((i % 7) as usize);
            json!({"id": i, "name": format!("portal{padding}")})
        })
        .collect();

    let index = index_for("name:portal", &records).unwrap();
    let hits = evaluate(&index, &parse("name:portal").unwrap(), MAX_RESULTS).unwrap();

    assert_eq!(hits.len(), MAX_RESULTS);
    assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    // Short names come first.
    assert_eq!(index.stored_id(hits[0].doc).map(|id| id % 7), Some(0));
}

#[test]
fn test_term_frequency_raises_score() {
    let root = index_root();
    let service = make_search_service(
        root.path(),
        vec![
            json!({"id": 1, "name": "portal"}),
            json!({"id": 2, "name": "portal portal"}),
        ],
    );

    assert_eq!(search_ids(&service, "name:portal"), vec!["2", "1"]);
}

#[test]
fn test_rarer_term_weighs_more() {
    let root = index_root();
    let service = make_search_service(
        root.path(),
        vec![
            json!({"id": 1, "name": "common"}),
            json!({"id": 2, "name": "common"}),
            json!({"id": 3, "name": "common"}),
            json!({"id": 4, "name": "rare"}),
        ],
    );

    assert_eq!(search_ids(&service, "name:common name:rare")[0], "4");
}

#[test]
fn test_more_matching_clauses_rank_higher() {
    let root = index_root();
    let service = make_search_service(
        root.path(),
        vec![
            json!({"id": 1, "name": "cas", "description": "other"}),
            json!({"id": 2, "name": "cas", "description": "portal"}),
        ],
    );

    assert_eq!(
        search_ids(&service, "name:cas description:portal"),
        vec!["2", "1"]
    );
}
