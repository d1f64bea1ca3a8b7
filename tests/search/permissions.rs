// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Records a caller cannot see are never indexed and never returned.

use super::common::{index_root, make_search_service, registry, IdCaller};
use regsearch::UserProfile;
use serde_json::json;

fn ids(items: Vec<regsearch::ServiceItem>) -> Vec<String> {
    items.into_iter().map(|item| item.assigned_id).collect()
}

#[test]
fn test_invisible_records_are_never_returned() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());
    let caller = IdCaller {
        name: "alice".into(),
        visible: vec![1, 3],
    };

    let items = service.search(&caller, "name:/.*/").unwrap();
    assert_eq!(ids(items), vec!["1", "3"]);

    // Matches the hidden record only.
    assert!(service.search(&caller, "name:portal").unwrap().is_empty());
}

#[test]
fn test_service_id_patterns() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());
    let caller =
        UserProfile::with_patterns("bob", &[r"https://(cas|wiki)\.example\.org/.*"]).unwrap();

    assert_eq!(ids(service.search(&caller, "name:/.*/").unwrap()), vec!["1", "3"]);
}

#[test]
fn test_patterns_are_anchored() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());
    let caller = UserProfile::with_patterns("bob", &["cas"]).unwrap();

    assert!(service.search(&caller, "name:/.*/").unwrap().is_empty());
}

#[test]
fn test_star_pattern_sees_everything() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());
    let caller = UserProfile::with_patterns("carol", &["*"]).unwrap();

    assert_eq!(service.search(&caller, "name:/.*/").unwrap().len(), 6);
}

#[test]
fn test_invalid_pattern_is_rejected() {
    assert!(UserProfile::with_patterns("dave", &["("]).is_err());
}

#[test]
fn test_hidden_records_do_not_shift_ranking() {
    // Hidden records all say "rare". Were they indexed, "rare" would become
    // the common term and the ranking would flip.
    let visible = vec![
        json!({"id": 1, "name": "common"}),
        json!({"id": 2, "name": "rare"}),
        json!({"id": 3, "name": "common"}),
    ];
    let mut all = visible.clone();
    all.extend((10..20).map(|i| json!({"id": i, "name": "rare"})));

    let caller = IdCaller {
        name: "erin".into(),
        visible: vec![1, 2, 3],
    };
    let query = "name:common name:rare";

    let root = index_root();
    let scoped = ids(make_search_service(root.path(), all).search(&caller, query).unwrap());
    let alone = ids(make_search_service(root.path(), visible)
        .search(&UserProfile::unrestricted("erin"), query)
        .unwrap());

    assert_eq!(scoped, vec!["2", "1", "3"]);
    assert_eq!(scoped, alone);
}

#[test]
fn test_hidden_record_without_id_is_never_returned() {
    let root = index_root();
    let service = make_search_service(
        root.path(),
        vec![
            json!({"name": "portal", "serviceId": "https://public.example.org"}),
            json!({"name": "secret", "serviceId": "https://hidden.example.org"}),
        ],
    );
    let caller = UserProfile::with_patterns("frank", &[r"https://public\..*"]).unwrap();

    let items = service.search(&caller, "name:portal").unwrap();
    assert!(items.iter().all(|item| item.service_id != "https://hidden.example.org"));
}

#[test]
fn test_shared_id_does_not_leak_hidden_record() {
    let root = index_root();
    let service = make_search_service(
        root.path(),
        vec![
            json!({"id": 7, "name": "portal", "serviceId": "https://public.example.org"}),
            json!({"id": 7, "name": "secret", "serviceId": "https://hidden.example.org"}),
        ],
    );
    let caller = UserProfile::with_patterns("frank", &[r"https://public\..*"]).unwrap();

    let items = service.search(&caller, "name:portal").unwrap();
    assert!(items.iter().all(|item| item.name != "secret"));
}
