// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Searching registrations loaded from a JSON file.

use super::common::{index_root, registry};
use regsearch::{JsonFileSource, SearchConfig, SearchService, SourceError, UserProfile};
use std::fs;
use tempfile::TempDir;

fn write_records(contents: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("services.json");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn test_search_over_file() {
    let json = serde_json::to_string(&registry()).unwrap();
    let (_dir, path) = write_records(&json);
    let root = index_root();

    let service = SearchService::new(
        JsonFileSource::open(&path).unwrap(),
        SearchConfig::default().with_index_root(root.path()),
    );
    let items = service
        .search(&UserProfile::unrestricted("tester"), "type:oauth")
        .unwrap();

    let mut names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Legacy", "Mobile"]);
    assert_eq!(items[0].service_type, "OAuthRegisteredService");
}

#[test]
fn test_item_summary_fields() {
    let json = serde_json::to_string(&registry()).unwrap();
    let (_dir, path) = write_records(&json);
    let root = index_root();

    let service = SearchService::new(
        JsonFileSource::open(&path).unwrap(),
        SearchConfig::default().with_index_root(root.path()),
    );
    let items = service
        .search(&UserProfile::unrestricted("tester"), "name:wiki")
        .unwrap();

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.assigned_id, "3");
    assert_eq!(item.eval_order, 3);
    assert_eq!(item.service_id, "https://wiki.example.org/.*");
    assert_eq!(item.description, "Description of Wiki");
    assert_eq!(item.service_type, "CasRegisteredService");

    let encoded = serde_json::to_value(item).unwrap();
    assert_eq!(encoded["assignedId"], "3");
    assert_eq!(encoded["serviceId"], "https://wiki.example.org/.*");
}

#[test]
fn test_not_an_array() {
    let (_dir, path) = write_records(r#"{"id": 1}"#);
    assert!(matches!(
        JsonFileSource::open(&path),
        Err(SourceError::NotAnArray)
    ));

    let (_dir, path) = write_records("[1, 2]");
    assert!(matches!(
        JsonFileSource::open(&path),
        Err(SourceError::NotAnArray)
    ));
}

#[test]
fn test_invalid_json() {
    let (_dir, path) = write_records("[{");
    assert!(matches!(JsonFileSource::open(&path), Err(SourceError::Json(_))));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = JsonFileSource::open(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
}
