//! Query Engine Integration Tests
//!
//! Tests for match soundness/completeness, ordering, and concurrent use.

use std::sync::Arc;

use gzsearch::{Collection, QueryEngine, Record};

fn catalog() -> Collection {
    let titles = [
        ("Blue Car", "fast and blue"),
        ("Red Bus", "Blue interior"),
        ("Green Van", "slow"),
        ("blue whale", "ocean"),
        ("Car wash", "soap and water"),
        ("", ""),
        ("Carpet", "Blue Car parked"),
    ];
    titles
        .iter()
        .enumerate()
        .map(|(i, (title, content))| Record::new(i as i64 + 1, *title, *content))
        .collect()
}

/// Check soundness, completeness and order against a naive filter
fn assert_matches_predicate(engine: &QueryEngine, query: &str) {
    let expected: Vec<i64> = engine
        .collection()
        .iter()
        .filter(|r| r.title.contains(query) || r.content.contains(query))
        .map(|r| r.id)
        .collect();

    let actual: Vec<i64> = engine.search(query).iter().map(|r| r.id).collect();
    assert_eq!(actual, expected, "query {:?}", query);
}

#[test]
fn test_results_satisfy_predicate() {
    let engine = QueryEngine::new(catalog());

    for query in ["Blue", "blue", "Car", "car", "a", " ", "Blue Car", "xyz", "Carpet", ""] {
        assert_matches_predicate(&engine, query);
    }
}

#[test]
fn test_results_preserve_collection_order() {
    let engine = QueryEngine::new(catalog());
    let ids: Vec<i64> = engine.search("Car").iter().map(|r| r.id).collect();

    assert_eq!(ids, vec![1, 5, 7]);
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_empty_query_returns_everything() {
    let collection = catalog();
    let engine = QueryEngine::new(collection.clone());

    let all: Vec<Record> = engine.search_owned("");
    assert_eq!(all.as_slice(), collection.as_slice());
}

#[test]
fn test_no_match_is_empty_not_error() {
    let engine = QueryEngine::new(catalog());
    assert!(engine.search("purple").is_empty());
}

#[test]
fn test_duplicate_ids_are_kept() {
    let engine = QueryEngine::new(Collection::from(vec![
        Record::new(1, "same", ""),
        Record::new(1, "same", ""),
    ]));

    assert_eq!(engine.search("same").len(), 2);
}

#[test]
fn test_concurrent_searches_share_one_collection() {
    let engine = Arc::new(QueryEngine::new(catalog()));

    std::thread::scope(|scope| {
        for query in ["Blue", "Car", "", "slow", "missing"] {
            for _ in 0..4 {
                let engine = Arc::clone(&engine);
                scope.spawn(move || assert_matches_predicate(&engine, query));
            }
        }
    });
}

#[tokio::test]
async fn test_engine_clones_across_tasks() {
    let engine = QueryEngine::new(catalog());

    let handles: Vec<_> = ["Blue", "Van"]
        .into_iter()
        .map(|query| {
            let engine = engine.clone();
            tokio::spawn(async move { engine.search_owned(query).len() })
        })
        .collect();

    let mut counts = Vec::new();
    for handle in handles {
        counts.push(handle.await.unwrap());
    }

    assert_eq!(counts, vec![3, 1]);
}
