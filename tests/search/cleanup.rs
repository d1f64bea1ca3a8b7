// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! No index directory survives a search, whatever the outcome.

use super::common::{entries, index_root, make_search_service, registry, search_ids};
use regsearch::{
    build_index, IndexStorage, MemorySource, SearchConfig, SearchError, SearchService,
    UserProfile,
};
use std::fs;

#[test]
fn test_cleanup_after_success() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(search_ids(&service, "name:wiki"), vec!["3"]);
    assert!(entries(&root.path().join("tester")).is_empty());
}

#[test]
fn test_cleanup_after_parse_failure() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    let report = service
        .search_report(&UserProfile::unrestricted("tester"), "name:(wiki")
        .unwrap();
    assert!(report.is_degraded());
    assert!(entries(&root.path().join("tester")).is_empty());
}

#[test]
fn test_cleanup_after_read_failure() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    let report = service
        .search_report(&UserProfile::unrestricted("tester"), "name:/[/")
        .unwrap();
    assert!(matches!(report.degraded, Some(SearchError::IndexIo(_))));
    assert!(entries(&root.path().join("tester")).is_empty());
}

#[test]
fn test_build_failure_is_returned() {
    let root = index_root();
    let blocker = root.path().join("not-a-dir");
    fs::write(&blocker, b"occupied").unwrap();

    let service = SearchService::new(
        MemorySource::new(registry()),
        SearchConfig::default().with_index_root(&blocker),
    );
    let err = service
        .search(&UserProfile::unrestricted("tester"), "name:wiki")
        .unwrap_err();

    assert!(matches!(err, SearchError::IndexBuild(_)));
    assert!(!err.is_degradable());
    assert_eq!(fs::read(&blocker).unwrap(), b"occupied");
}

#[test]
fn test_storage_dropped_mid_call() {
    let root = index_root();
    let storage = IndexStorage::acquire(root.path(), "tester").unwrap();
    storage.write(&build_index(&[])).unwrap();
    let dir = storage.path().to_path_buf();
    assert!(dir.exists());

    drop(storage);
    assert!(!dir.exists());
    assert!(entries(&root.path().join("tester")).is_empty());
}

#[test]
fn test_concurrent_searches_by_one_caller() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    std::thread::scope(|s| {
        let handles: Vec<_> = ["name:wiki", "name:mobile", "name:/CAS.*/", "name:legacy"]
            .into_iter()
            .map(|q| s.spawn(|| search_ids(&service, q)))
            .collect();
        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(results[0], vec!["3"]);
        assert_eq!(results[1], vec!["4"]);
        assert_eq!(results[2], vec!["1", "2"]);
        assert_eq!(results[3], vec!["5"]);
    });

    assert!(entries(&root.path().join("tester")).is_empty());
}

#[test]
fn test_caller_names_cannot_escape_root() {
    let root = index_root();
    let nested = root.path().join("indexes");
    let service = SearchService::new(
        MemorySource::new(registry()),
        SearchConfig::default().with_index_root(&nested),
    );

    let items = service
        .search(&UserProfile::unrestricted("../../etc"), "name:wiki")
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(entries(root.path()), vec!["indexes"]);
}
