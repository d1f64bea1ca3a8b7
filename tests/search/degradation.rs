// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Malformed queries come back empty with a diagnostic instead of failing.

use super::common::{index_root, make_search_service, registry};
use regsearch::{SearchError, SourceError, UserProfile};

fn degraded(query: &str) -> Option<SearchError> {
    let root = index_root();
    let service = make_search_service(root.path(), registry());
    let report = service
        .search_report(&UserProfile::unrestricted("tester"), query)
        .unwrap();
    assert!(report.items.is_empty(), "{query} returned items");
    report.degraded
}

#[test]
fn test_syntax_errors_degrade() {
    for query in [
        "name:\"open phrase",
        "name:(wiki",
        "name:wiki)",
        "name:[1 TO",
        "name:[1 2]",
        "name:/open",
        "name:wiki~2",
        "name:wiki^3",
        "AND name:wiki",
        "&& name:wiki",
        "name:",
    ] {
        assert!(
            matches!(degraded(query), Some(SearchError::Syntax(_))),
            "{query} should be a syntax error"
        );
    }
}

#[test]
fn test_invalid_regexp_degrades() {
    let err = degraded("name:/(unclosed/");
    assert!(matches!(err, Some(SearchError::IndexIo(_))));
    assert!(err.unwrap().to_string().contains("(unclosed"));
}

#[test]
fn test_syntax_error_names_position() {
    let Some(SearchError::Syntax(e)) = degraded("name:\"open") else {
        panic!("expected a syntax error");
    };
    assert_eq!(e.position, 5);
}

#[test]
fn test_blank_query_degrades() {
    assert!(matches!(degraded("   "), Some(SearchError::Syntax(_))));
}

#[test]
fn test_query_that_analyzes_away_matches_nothing() {
    assert!(degraded("\"...\"").is_none());
}

#[test]
fn test_source_failure_is_not_degraded() {
    let err: SearchError = SourceError::NotAnArray.into();
    assert!(!err.is_degradable());
}
