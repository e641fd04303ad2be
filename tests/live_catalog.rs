//! End-to-end contract tests against a real server. They are ignored by
//! default; set `MONGODB_URI` (defaults to mongodb://localhost:27017) and
//! run `cargo test -- --ignored` with a server available.

use bookstore::catalog::{Page, SortOrder};
use bookstore::{Bookstore, Settings};
use bson::{Document, doc};
use std::collections::HashSet;



fn test_settings(collection: &str) -> Settings {
    Settings {
        uri: std::env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".into()),
        database: "bookstore_tests".into(),
        collection: collection.into(),
    }
}

fn fixture() -> Vec<Document> {
    vec![
        doc! {"title": "A1", "author": "A", "genre": "Fiction", "published_year": 1994, "price": 10.0, "in_stock": true},
        doc! {"title": "A2", "author": "A", "genre": "Fiction", "published_year": 2001, "price": 20.0, "in_stock": false},
        doc! {"title": "B1", "author": "B", "genre": "Sci-Fi", "published_year": 2010, "price": 15.0, "in_stock": true},
        doc! {"title": "B2", "author": "B", "genre": "Sci-Fi", "published_year": 2015, "price": 25.0, "in_stock": true},
        doc! {"title": "C1", "author": "C", "genre": "History", "published_year": 2015, "price": 30.0, "in_stock": false},
    ]
}

/// Drops the collection, seeds the fixture and returns the store plus the
/// ids the engine assigned (in fixture order).
async fn seeded(collection: &str) -> (Bookstore, Vec<String>) {
    let store = Bookstore::connect(&test_settings(collection)).await.unwrap();
    let raw = store.books().clone_with_type::<Document>();
    let _ = raw.drop().await;
    let inserted = raw.insert_many(fixture()).await.unwrap().inserted_ids;
    let mut ids = Vec::new();
    for i in 0..fixture().len() {
        ids.push(inserted[&i].as_object_id().unwrap().to_hex());
    }
    (store, ids)
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn by_author_returns_exactly_that_authors_books() {
    let (store, _) = seeded("live_by_author").await;
    let books = store.books_by_author("A").await.unwrap();
    let titles: HashSet<String> = books.iter().map(|b| b.title.clone()).collect();
    assert_eq!(titles, HashSet::from(["A1".to_string(), "A2".to_string()]));
    assert!(books.iter().all(|b| b.author == "A"));
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn published_after_excludes_the_boundary_year() {
    let (store, _) = seeded("live_year_boundary").await;
    // Two books are from 2015 exactly; strictly-after leaves nothing.
    assert!(store.published_after(2015).await.unwrap().is_empty());
    let after_2014: HashSet<String> =
        store.published_after(2014).await.unwrap().into_iter().map(|b| b.title).collect();
    assert_eq!(after_2014, HashSet::from(["B2".to_string(), "C1".to_string()]));
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn in_stock_after_applies_both_conditions() {
    let (store, _) = seeded("live_in_stock").await;
    let titles: HashSet<String> = store
        .in_stock_published_after(2000)
        .await
        .unwrap()
        .into_iter()
        .map(|b| b.title)
        .collect();
    assert_eq!(titles, HashSet::from(["B1".to_string(), "B2".to_string()]));
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn pagination_tiles_the_collection_with_a_partial_tail() {
    let (store, _) = seeded("live_paginate").await;
    let mut seen = HashSet::new();
    for (page, expected) in [(1, 2), (2, 2), (3, 1), (4, 0)] {
        let books = store.books_page(Page::clamped(page, 2)).await.unwrap();
        assert_eq!(books.len(), expected, "page {page}");
        for b in books {
            assert!(seen.insert(b.id), "page {page} repeated a book");
        }
    }
    assert_eq!(seen.len(), 5);
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn sorted_by_price_honors_both_directions() {
    let (store, _) = seeded("live_sorted").await;
    let asc: Vec<f64> =
        store.books_sorted_by_price(SortOrder::Asc).await.unwrap().iter().map(|b| b.price).collect();
    let mut expected = asc.clone();
    expected.sort_by(f64::total_cmp);
    assert_eq!(asc, expected);
    let desc: Vec<f64> = store
        .books_sorted_by_price(SortOrder::Desc)
        .await
        .unwrap()
        .iter()
        .map(|b| b.price)
        .collect();
    let reversed: Vec<f64> = expected.into_iter().rev().collect();
    assert_eq!(desc, reversed);
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn update_price_is_idempotent_and_ignores_missing_ids() {
    let (store, ids) = seeded("live_update").await;
    let first = store.update_price(&ids[0], 99.5).await.unwrap();
    assert_eq!((first.matched, first.modified), (1, 1));
    let second = store.update_price(&ids[0], 99.5).await.unwrap();
    assert_eq!((second.matched, second.modified), (1, 0));
    let missing = bson::oid::ObjectId::new().to_hex();
    let none = store.update_price(&missing, 1.0).await.unwrap();
    assert_eq!((none.matched, none.modified), (0, 0));
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn delete_by_id_removes_the_book_for_good() {
    let (store, ids) = seeded("live_delete").await;
    let r = store.delete_by_id(&ids[0]).await.unwrap();
    assert_eq!(r.deleted, 1);
    assert!(store.all_books().await.unwrap().iter().all(|b| b.id.to_hex() != ids[0]));
    assert!(store.books_by_author("A").await.unwrap().iter().all(|b| b.id.to_hex() != ids[0]));
    let again = store.delete_by_id(&ids[0]).await.unwrap();
    assert_eq!(again.deleted, 0);
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn average_price_by_genre_is_the_mean_sorted_ascending() {
    let (store, _) = seeded("live_average").await;
    let rows = store.average_price_by_genre().await.unwrap();
    let pairs: Vec<(String, f64)> =
        rows.into_iter().map(|r| (r.genre, r.average_price)).collect();
    assert_eq!(
        pairs,
        vec![
            ("Fiction".to_string(), 15.0),
            ("Sci-Fi".to_string(), 20.0),
            ("History".to_string(), 30.0),
        ]
    );
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn author_with_most_books_picks_the_majority_author() {
    let store = Bookstore::connect(&test_settings("live_most_books")).await.unwrap();
    let raw = store.books().clone_with_type::<Document>();
    let _ = raw.drop().await;
    raw.insert_many(vec![
        doc! {"title": "x", "author": "A", "genre": "Fiction", "published_year": 2000, "price": 1.0, "in_stock": true},
        doc! {"title": "y", "author": "A", "genre": "Fiction", "published_year": 2001, "price": 1.0, "in_stock": true},
        doc! {"title": "z", "author": "B", "genre": "Fiction", "published_year": 2002, "price": 1.0, "in_stock": true},
    ])
    .await
    .unwrap();
    let top = store.author_with_most_books().await.unwrap().unwrap();
    assert_eq!(top.author, "A");
    assert_eq!(top.book_count, 2);
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn author_with_most_books_is_none_on_an_empty_collection() {
    let store = Bookstore::connect(&test_settings("live_most_books_empty")).await.unwrap();
    let _ = store.books().clone_with_type::<Document>().drop().await;
    assert!(store.author_with_most_books().await.unwrap().is_none());
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn decades_count_ascending() {
    let (store, _) = seeded("live_decades").await;
    let rows = store.books_by_decade().await.unwrap();
    let pairs: Vec<(i32, i64)> = rows.into_iter().map(|r| (r.decade, r.book_count)).collect();
    assert_eq!(pairs, vec![(199, 1), (200, 1), (201, 3)]);
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn index_creation_is_idempotent_and_named_after_its_keys() {
    let (store, _) = seeded("live_indexes").await;
    assert_eq!(store.create_title_index().await.unwrap(), "title_1");
    assert_eq!(store.create_title_index().await.unwrap(), "title_1");
    assert_eq!(store.create_author_year_index().await.unwrap(), "author_1_published_year_1");
    store.close().await;
}

#[tokio::test]
#[ignore = "requires a running MongoDB server"]
async fn explain_reports_an_execution_plan() {
    let (store, _) = seeded("live_explain").await;
    store.create_title_index().await.unwrap();
    let plan = store.explain_title_query().await.unwrap();
    assert!(plan.get_document("queryPlanner").is_ok());
    assert!(plan.get_document("executionStats").is_ok());
    store.close().await;
}
