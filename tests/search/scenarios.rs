// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query scenarios over a small registry.
//!
//! Each test builds a fresh service, so every search runs against its own
//! ephemeral index exactly as production calls do.

use super::common::{
    index_root, make_search_service, make_service, make_service_with_policy, registry,
    search_ids, sorted_ids,
};
use serde_json::json;

// ============================================================================
// EXACT AND REGEXP
// ============================================================================

#[test]
fn test_exact_match_on_raw_value() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(
        search_ids(&service, r"serviceId:/https:\/\/wiki\.example\.org\/\.\*/"),
        vec!["3"]
    );
}

#[test]
fn test_regexp_prefix() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    // Constant scores, so ties keep source order.
    assert_eq!(search_ids(&service, "name:/CAS.*/"), vec!["1", "2"]);
    assert_eq!(search_ids(&service, "name:/^CAS.*$/"), vec!["1", "2"]);
}

#[test]
fn test_regexp_is_case_sensitive_and_anchored() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert!(search_ids(&service, "name:/cas.*/").is_empty());
    assert!(search_ids(&service, "name:/Client/").is_empty());
    assert_eq!(search_ids(&service, "name:/.*Client.*/"), vec!["2"]);
}

// ============================================================================
// ANALYZED TEXT
// ============================================================================

#[test]
fn test_term_is_case_insensitive() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(sorted_ids(&service, "name:CAS"), vec!["1", "2"]);
    assert_eq!(sorted_ids(&service, "name:cas"), vec!["1", "2"]);
}

#[test]
fn test_shorter_field_ranks_first() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    // "CAS Service" is shorter than "CAS Client Portal".
    assert_eq!(search_ids(&service, "name:cas"), vec!["1", "2"]);
}

#[test]
fn test_phrase() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(sorted_ids(&service, "description:\"of cas\""), vec!["1", "2"]);
    assert_eq!(search_ids(&service, "description:\"cas client\""), vec!["2"]);
    assert!(search_ids(&service, "description:\"client cas\"").is_empty());
}

#[test]
fn test_wildcard_on_text() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(search_ids(&service, "name:port*"), vec!["2"]);
    assert_eq!(search_ids(&service, "name:Port*"), vec!["2"]);
    assert_eq!(search_ids(&service, "name:w?ki"), vec!["3"]);
}

#[test]
fn test_default_field_is_body() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(search_ids(&service, "wiki"), vec!["3"]);
    assert_eq!(search_ids(&service, "body:wiki"), vec!["3"]);
}

#[test]
fn test_juxtaposition_is_or() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(sorted_ids(&service, "name:wiki name:mobile"), vec!["3", "4"]);
}

// ============================================================================
// NUMERIC AND RANGES
// ============================================================================

#[test]
fn test_numeric_range() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(
        search_ids(&service, "clientSecretExpiration:[100 TO 400]"),
        vec!["4"]
    );
    assert!(search_ids(&service, "clientSecretExpiration:[400 TO 500]").is_empty());
    assert_eq!(
        search_ids(&service, "clientSecretExpiration:[* TO 100]"),
        vec!["5"]
    );
}

#[test]
fn test_range_bounds_inclusivity() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(
        sorted_ids(&service, "clientSecretExpiration:[30 TO 365]"),
        vec!["4", "5"]
    );
    assert_eq!(
        search_ids(&service, "clientSecretExpiration:{30 TO 365]"),
        vec!["4"]
    );
    assert!(search_ids(&service, "clientSecretExpiration:{30 TO 365}").is_empty());
}

#[test]
fn test_range_compares_numbers_not_strings() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    // Lexicographically "365" < "99"; numerically it is not.
    assert_eq!(
        search_ids(&service, "clientSecretExpiration:[99 TO 1000]"),
        vec!["4"]
    );
}

#[test]
fn test_number_as_exact_term() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(search_ids(&service, "clientSecretExpiration:365"), vec!["4"]);
    assert_eq!(sorted_ids(&service, "evalOrder:[2 TO 3]"), vec!["2", "3"]);
}

#[test]
fn test_id_is_always_searchable() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(search_ids(&service, "id:4"), vec!["4"]);
    assert_eq!(sorted_ids(&service, "id:[5 TO *]"), vec!["5", "6"]);
}

// ============================================================================
// BOOLEANS AND NESTING
// ============================================================================

#[test]
fn test_boolean_with_negation() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(
        search_ids(&service, "type:oauth AND NOT enabled:false"),
        vec!["4"]
    );
    assert_eq!(search_ids(&service, "+type:oauth -enabled:true"), vec!["5"]);
}

#[test]
fn test_pure_negation_matches_nothing() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert!(search_ids(&service, "NOT name:wiki").is_empty());
}

#[test]
fn test_nested_path() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(search_ids(&service, "accessStrategy.enabled:false"), vec!["6"]);
    assert_eq!(search_ids(&service, "accessStrategy.ssoEnabled:true"), vec!["6"]);
}

#[test]
fn test_grouping() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert_eq!(
        sorted_ids(&service, "name:cas AND (name:portal OR description:service)"),
        vec!["1", "2"]
    );
    assert_eq!(
        search_ids(&service, "name:cas AND (name:portal OR name:wiki)"),
        vec!["2"]
    );
}

#[test]
fn test_missing_field_matches_nothing() {
    let root = index_root();
    let service = make_search_service(root.path(), registry());

    assert!(search_ids(&service, "noSuchField:anything").is_empty());
    assert!(search_ids(&service, "noSuchField:/.*/").is_empty());
}

// ============================================================================
// BODY
// ============================================================================

#[test]
fn test_body_folds_in_policy() {
    let root = index_root();
    let service = make_search_service(
        root.path(),
        vec![
            json!({"id": 1, "name": "CAS Service", "attributeReleasePolicy": {"type": "allow"}}),
            json!({"id": 2, "name": "Other", "attributeReleasePolicy": {"type": "deny"}}),
        ],
    );

    assert_eq!(search_ids(&service, "body:allow"), vec!["1"]);
    assert_eq!(search_ids(&service, "allow"), vec!["1"]);
}

#[test]
fn test_policy_field_by_name() {
    let root = index_root();
    let service = make_search_service(
        root.path(),
        vec![
            make_service_with_policy(1, "Alpha", "allow"),
            make_service_with_policy(2, "Beta", "deny"),
            make_service(3, "Gamma", "https://gamma.example.org"),
        ],
    );

    assert_eq!(search_ids(&service, "attributeReleasePolicy:deny"), vec!["2"]);
    assert_eq!(
        search_ids(&service, "body:alpha AND attributeReleasePolicy:allow"),
        vec!["1"]
    );
}
