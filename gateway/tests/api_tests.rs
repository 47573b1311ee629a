use std::sync::Arc;

use canopy_gateway::{build_router, GatewayState};
use canopy_store::MemoryStore;
use canopy_types::{Entity, Key, PropertyValue};
use pretty_assertions::assert_eq;
use serde_json::Value;

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    for id in 1..=5 {
        store.put(
            Entity::new(Key::with_id("Person", id))
                .with_property("name", format!("person-{id}"))
                .with_property("age", 20 + id),
        );
    }
    store.put(Entity::new(Key::with_id("Order", 1)).with_property("total", 99i64));
    store
}

/// Spin up the gateway on an OS-assigned port, returning the base URL.
async fn spawn_test_server(store: MemoryStore) -> String {
    let app = build_router(GatewayState::new(Arc::new(store)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

// ── Listing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lists_entities_of_a_kind_as_rows() {
    let base = spawn_test_server(seeded_store()).await;
    let resp = reqwest::get(format!("{}/db/entity?kind=Person", base))
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let rows: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["__key__"]["value"], "Person(1)");
    assert_eq!(rows[0]["__key__"]["type"], "KEY");
    assert_eq!(rows[0]["name"]["value"], "person-1");
    assert_eq!(rows[0]["name"]["type"], "STRING");
    assert_eq!(rows[0]["age"]["value"], "21");
    assert_eq!(rows[0]["age"]["type"], "INTEGER");
}

#[tokio::test]
async fn response_content_type_is_json() {
    let base = spawn_test_server(seeded_store()).await;
    let resp = reqwest::get(format!("{}/db/entity?kind=Person", base))
        .await
        .unwrap();

    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"));
}

#[tokio::test]
async fn repeated_filters_are_anded() {
    let base = spawn_test_server(seeded_store()).await;
    let url = format!(
        "{}/db/entity?kind=Person&filter=age+%3E+Long(21)&filter=age+%3C+Long(25)",
        base
    );
    let rows: Vec<Value> = reqwest::get(url).await.unwrap().json().await.unwrap();
    // ages run 21..=25; 22, 23, 24 pass
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn key_filters_select_single_entities() {
    let base = spawn_test_server(seeded_store()).await;
    let url = format!(
        "{}/db/entity?kind=Person&filter=__key__+%3D+Key(Person(2))",
        base
    );
    let rows: Vec<Value> = reqwest::get(url).await.unwrap().json().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["__key__"]["value"], "Person(2)");
}

#[tokio::test]
async fn limit_caps_the_listing() {
    let base = spawn_test_server(seeded_store()).await;
    let url = format!("{}/db/entity?kind=Person&limit=2", base);
    let rows: Vec<Value> = reqwest::get(url).await.unwrap().json().await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn ancestor_queries_span_kinds() {
    let store = MemoryStore::new();
    let dept = Key::with_name("Dept", "eng");
    store.put(Entity::new(dept.clone()));
    store.put(Entity::new(dept.clone().child_with_id("Person", 1)));
    store.put(Entity::new(dept.clone().child_with_id("Desk", 2)));
    store.put(Entity::new(Key::with_name("Dept", "ops")));

    let base = spawn_test_server(store).await;
    let url = format!("{}/db/entity?ancestor=Dept(%22eng%22)", base);
    let rows: Vec<Value> = reqwest::get(url).await.unwrap().json().await.unwrap();
    assert_eq!(rows.len(), 3);
}

// ── Counting ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn counts_matching_entities() {
    let base = spawn_test_server(seeded_store()).await;
    let count: usize = reqwest::get(format!("{}/db/entity/count?kind=Person", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(count, 5);
}

#[tokio::test]
async fn count_respects_filters() {
    let base = spawn_test_server(seeded_store()).await;
    let url = format!("{}/db/entity/count?kind=Person&filter=age+%3E%3D+Long(24)", base);
    let count: usize = reqwest::get(url).await.unwrap().json().await.unwrap();
    assert_eq!(count, 2);
}

// ── Kinds ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn lists_kinds_sorted() {
    let base = spawn_test_server(seeded_store()).await;
    let kinds: Vec<String> = reqwest::get(format!("{}/db/kind", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(kinds, vec!["Order", "Person"]);
}

// ── Deleting ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deletes_matching_entities_and_reports_the_count() {
    let store = seeded_store();
    let base = spawn_test_server(store.clone()).await;
    let client = reqwest::Client::new();
    let deleted: usize = client
        .delete(format!("{}/db/entity?kind=Person", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(deleted, 5);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn delete_honors_filters() {
    let store = seeded_store();
    let base = spawn_test_server(store.clone()).await;
    let client = reqwest::Client::new();
    let url = format!("{}/db/entity?kind=Person&filter=age+%3E+Long(23)", base);
    let deleted: usize = client
        .delete(url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // ages run 21..=25; 24 and 25 pass
    assert_eq!(deleted, 2);
    assert_eq!(store.len(), 4);
}

// ── Errors ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_kind_and_ancestor_is_a_400() {
    let base = spawn_test_server(seeded_store()).await;
    let resp = reqwest::get(format!("{}/db/entity", base)).await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "no 'kind' or 'ancestor' argument");
}

#[tokio::test]
async fn malformed_filters_are_a_400_naming_the_input() {
    let base = spawn_test_server(seeded_store()).await;
    let url = format!("{}/db/entity?kind=Person&filter=age+%3E+Widget(21)", base);
    let resp = reqwest::get(url).await.unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("age > Widget(21)"), "{message}");
}

#[tokio::test]
async fn malformed_ancestors_are_a_400() {
    let base = spawn_test_server(seeded_store()).await;
    let resp = reqwest::get(format!("{}/db/entity?ancestor=garbage", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn bad_limit_is_a_400() {
    let base = spawn_test_server(seeded_store()).await;
    let resp = reqwest::get(format!("{}/db/entity?kind=Person&limit=lots", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let base = spawn_test_server(seeded_store()).await;
    let resp = reqwest::get(format!("{}/db/nonexistent", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn count_with_no_target_is_a_400() {
    let base = spawn_test_server(seeded_store()).await;
    let resp = reqwest::get(format!("{}/db/entity/count", base)).await.unwrap();
    assert_eq!(resp.status(), 400);
}

// ── Row contents end to end ─────────────────────────────────────────────────

#[tokio::test]
async fn rows_render_special_values() {
    let store = MemoryStore::new();
    store.put(
        Entity::new(Key::with_id("Doc", 1))
            .with_property("missing", PropertyValue::Null)
            .with_property("payload", PropertyValue::Blob(vec![0; 16])),
    );
    let base = spawn_test_server(store).await;
    let rows: Vec<Value> = reqwest::get(format!("{}/db/entity?kind=Doc", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(rows[0]["missing"]["value"], "null");
    assert_eq!(rows[0]["missing"]["type"], "NULL");
    assert_eq!(rows[0]["payload"]["value"], "<Blob: 16 bytes>");
    assert_eq!(rows[0]["payload"]["type"], "BLOB");
}
