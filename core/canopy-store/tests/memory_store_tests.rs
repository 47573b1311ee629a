use canopy_store::{EntityStore, FetchOptions, FilterOperator, FilterPredicate, MemoryStore, Query, QueryFilter};
use canopy_types::{Entity, Key};
use pretty_assertions::assert_eq;

fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    for id in 1..=5 {
        store.put(Entity::new(Key::with_id("Person", id)).with_property("age", 20 + id));
    }
    store.put(Entity::new(Key::with_id("Order", 1)).with_property("total", 99i64));
    store
}

// ── Writes ──────────────────────────────────────────────────────────────────

#[test]
fn put_replaces_by_key_in_place() {
    let store = MemoryStore::new();
    store.put(Entity::new(Key::with_id("P", 1)).with_property("v", 1i64));
    store.put(Entity::new(Key::with_id("P", 2)).with_property("v", 2i64));
    store.put(Entity::new(Key::with_id("P", 1)).with_property("v", 9i64));
    assert_eq!(store.len(), 2);
}

// ── Queries ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn kind_query_returns_in_insertion_order() {
    let store = seeded();
    let results = store
        .run_query(&Query::of_kind("Person"), &FetchOptions::for_limit(100))
        .await
        .unwrap();
    let ids: Vec<String> = results.iter().map(|e| e.key().to_string()).collect();
    assert_eq!(
        ids,
        vec!["Person(1)", "Person(2)", "Person(3)", "Person(4)", "Person(5)"]
    );
}

#[tokio::test]
async fn limit_caps_results() {
    let store = seeded();
    let results = store
        .run_query(&Query::of_kind("Person"), &FetchOptions::for_limit(2))
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn zero_limit_returns_nothing() {
    let store = seeded();
    let results = store
        .run_query(&Query::of_kind("Person"), &FetchOptions::for_limit(0))
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn filters_narrow_results() {
    let store = seeded();
    let over_23 = FilterPredicate::new("age", FilterOperator::GreaterThan, 23i64.into());
    let query = Query::of_kind("Person").filtered(QueryFilter::Predicate(over_23));
    let results = store
        .run_query(&query, &FetchOptions::for_limit(100))
        .await
        .unwrap();
    // ages run 21..=25; only 24 and 25 pass
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn keys_only_strips_properties() {
    let store = seeded();
    let query = Query::of_kind("Person").keys_only();
    let results = store
        .run_query(&query, &FetchOptions::for_limit(100))
        .await
        .unwrap();
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|e| e.property_count() == 0));
}

#[tokio::test]
async fn ancestor_query_includes_the_ancestor_itself() {
    let store = MemoryStore::new();
    let org = Key::with_id("Org", 1);
    store.put(Entity::new(org.clone()));
    store.put(Entity::new(org.clone().child_with_id("Team", 1)));
    store.put(Entity::new(Key::with_id("Org", 2)));

    let results = store
        .run_query(&Query::descendants_of(org), &FetchOptions::for_limit(100))
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}

// ── Deletes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_named_keys() {
    let store = seeded();
    store
        .delete(&[Key::with_id("Person", 1), Key::with_id("Person", 3)])
        .await
        .unwrap();
    assert_eq!(store.len(), 4);
    assert!(!store.contains(&Key::with_id("Person", 1)));
    assert!(store.contains(&Key::with_id("Person", 2)));
}

#[tokio::test]
async fn deleting_missing_keys_is_silent() {
    let store = seeded();
    store.delete(&[Key::with_id("Person", 99)]).await.unwrap();
    assert_eq!(store.len(), 6);
}

#[tokio::test]
async fn empty_delete_is_a_no_op() {
    let store = seeded();
    store.delete(&[]).await.unwrap();
    assert_eq!(store.len(), 6);
}

// ── Kinds ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn kinds_are_distinct_and_sorted() {
    let store = seeded();
    assert_eq!(store.kinds().await.unwrap(), vec!["Order", "Person"]);
}

#[tokio::test]
async fn empty_store_has_no_kinds() {
    let store = MemoryStore::new();
    assert!(store.kinds().await.unwrap().is_empty());
}
