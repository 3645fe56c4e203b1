use kit::testing::{TestClient, TestResponse};
use kit::{DatabaseConfig, DbConnection, Server};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use todo_api::middleware::LoggingMiddleware;
use todo_api::migrations::{Migrator, MigratorTrait};
use todo_api::{routes, TodoConfig, TodoStore};

const TOKEN: &str = "test-token";

async fn client_with(config: TodoConfig) -> TestClient {
    let db = DbConnection::connect(&DatabaseConfig::builder().url("sqlite::memory:").build())
        .await
        .unwrap();
    Migrator::up(db.inner(), None).await.unwrap();

    let server = Server::new(routes::register(TodoStore::new(db), &config))
        .middleware(LoggingMiddleware);
    TestClient::new(server).with_bearer(TOKEN)
}

async fn client() -> TestClient {
    client_with(TodoConfig::builder().api_token(TOKEN).build()).await
}

async fn create(client: &TestClient, name: &str, is_complete: bool) -> Value {
    let response = client
        .post_json("/api/todo", &json!({ "name": name, "isComplete": is_complete }))
        .await;
    assert_eq!(response.status(), 201);
    response.json()
}

fn assert_empty(response: &TestResponse, status: u16) {
    assert_eq!(response.status(), status);
    assert!(response.is_empty(), "expected empty body, got {}", response.text());
}

#[tokio::test]
async fn scenario_create_read_update_delete() {
    let client = client().await;

    let created = client
        .post_json("/api/todo", &json!({ "name": "Buy milk", "isComplete": false }))
        .await;
    assert_eq!(created.status(), 201);
    assert_eq!(created.header("location"), Some("/api/todo/1"));
    assert_eq!(
        created.json::<Value>(),
        json!({ "id": 1, "name": "Buy milk", "isComplete": false })
    );

    assert_eq!(client.get("/api/todo/1").await.status(), 200);

    let updated = client
        .put_json(
            "/api/todo/1",
            &json!({ "id": 1, "name": "Buy milk", "isComplete": true }),
        )
        .await;
    assert_empty(&updated, 204);

    let fetched = client.get("/api/todo/1").await;
    assert_eq!(
        fetched.json::<Value>(),
        json!({ "id": 1, "name": "Buy milk", "isComplete": true })
    );

    assert_empty(&client.delete("/api/todo/1").await, 204);
    assert_empty(&client.get("/api/todo/1").await, 404);
}

#[tokio::test]
async fn get_never_inserted_is_404() {
    let client = client().await;
    for id in [0, 1, 17, -3] {
        assert_empty(&client.get(&format!("/api/todo/{}", id)).await, 404);
    }
}

#[tokio::test]
async fn created_id_round_trips_through_get() {
    let client = client().await;
    let created = create(&client, "Walk dog", true).await;

    let id = created["id"].as_i64().unwrap();
    let fetched: Value = client.get(&format!("/api/todo/{}", id)).await.json();
    assert_eq!(fetched["name"], "Walk dog");
    assert_eq!(fetched["isComplete"], true);
}

#[tokio::test]
async fn create_honours_caller_supplied_id() {
    let client = client().await;
    let response = client
        .post_json("/api/todo", &json!({ "id": 40, "name": "Pinned", "isComplete": false }))
        .await;

    assert_eq!(response.status(), 201);
    assert_eq!(response.header("location"), Some("/api/todo/40"));
    assert_eq!(client.get("/api/todo/40").await.status(), 200);
}

#[tokio::test]
async fn create_with_taken_id_is_server_error() {
    let client = client().await;
    create(&client, "first", false).await;

    let response = client
        .post_json("/api/todo", &json!({ "id": 1, "name": "clash" }))
        .await;
    assert_eq!(response.status(), 500);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn create_with_omitted_fields_uses_defaults() {
    let client = client().await;
    let created: Value = client.post_json("/api/todo", &json!({})).await.json();
    assert_eq!(created, json!({ "id": 1, "name": "", "isComplete": false }));
}

#[tokio::test]
async fn malformed_body_is_400() {
    let client = client().await;
    create(&client, "keep", false).await;

    assert_empty(&client.send_raw("POST", "/api/todo", "{not json").await, 400);
    assert_empty(&client.send_raw("PUT", "/api/todo/1", r#"{"id": 1,"#).await, 400);
    assert_empty(
        &client
            .post_json("/api/todo", &json!({ "isComplete": "yes" }))
            .await,
        400,
    );

    let list: Vec<Value> = client.get("/api/todo").await.json();
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn non_object_body_is_400() {
    let client = client().await;
    let original = create(&client, "keep", false).await;

    for body in [r#"[5,"x",true]"#, "null", r#""name""#, "7"] {
        assert_empty(&client.send_raw("POST", "/api/todo", body).await, 400);
    }
    for body in [r#"[1,"y",true]"#, "null"] {
        assert_empty(&client.send_raw("PUT", "/api/todo/1", body).await, 400);
    }

    assert_empty(&client.get("/api/todo/5").await, 404);
    let list: Vec<Value> = client.get("/api/todo").await.json();
    assert_eq!(list, vec![original]);
}

#[tokio::test]
async fn non_integer_path_id_is_400() {
    let client = client().await;
    assert_empty(&client.get("/api/todo/abc").await, 400);
    assert_empty(&client.delete("/api/todo/1.5").await, 400);
    assert_empty(
        &client
            .put_json("/api/todo/x", &json!({ "id": 1, "name": "n" }))
            .await,
        400,
    );
}

#[tokio::test]
async fn repeated_put_is_idempotent() {
    let client = client().await;
    create(&client, "old", false).await;

    let body = json!({ "id": 1, "name": "new", "isComplete": true });
    assert_empty(&client.put_json("/api/todo/1", &body).await, 204);
    let first: Value = client.get("/api/todo/1").await.json();

    assert_empty(&client.put_json("/api/todo/1", &body).await, 204);
    let second: Value = client.get("/api/todo/1").await.json();

    assert_eq!(first, second);
    assert_eq!(second, body);
}

#[tokio::test]
async fn put_with_mismatched_id_is_400_and_leaves_record() {
    let client = client().await;
    let created = create(&client, "original", false).await;

    let response = client
        .put_json(
            "/api/todo/1",
            &json!({ "id": 2, "name": "changed", "isComplete": true }),
        )
        .await;
    assert_empty(&response, 400);

    let omitted_id = client
        .put_json("/api/todo/1", &json!({ "name": "changed" }))
        .await;
    assert_empty(&omitted_id, 400);

    let fetched: Value = client.get("/api/todo/1").await.json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn put_for_absent_record_is_ignored_by_default() {
    let client = client().await;
    let response = client
        .put_json("/api/todo/9", &json!({ "id": 9, "name": "ghost" }))
        .await;

    assert_empty(&response, 204);
    assert_empty(&client.get("/api/todo/9").await, 404);
}

#[tokio::test]
async fn put_for_absent_record_is_404_in_strict_mode() {
    let client = client_with(
        TodoConfig::builder()
            .api_token(TOKEN)
            .strict_update(true)
            .build(),
    )
    .await;

    let response = client
        .put_json("/api/todo/9", &json!({ "id": 9, "name": "ghost" }))
        .await;
    assert_empty(&response, 404);
}

#[tokio::test]
async fn delete_twice_is_404() {
    let client = client().await;
    create(&client, "gone soon", false).await;

    assert_empty(&client.delete("/api/todo/1").await, 204);
    assert_empty(&client.get("/api/todo/1").await, 404);
    assert_empty(&client.delete("/api/todo/1").await, 404);
}

#[tokio::test]
async fn list_length_tracks_inserts_and_deletes() {
    let client = client().await;
    let list: Vec<Value> = client.get("/api/todo").await.json();
    assert!(list.is_empty());

    for name in ["a", "b", "c", "d"] {
        create(&client, name, false).await;
    }
    assert_empty(&client.delete("/api/todo/2").await, 204);
    create(&client, "e", true).await;
    assert_empty(&client.delete("/api/todo/4").await, 204);

    let list: Vec<Value> = client.get("/api/todo").await.json();
    let names: Vec<&str> = list.iter().map(|v| v["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["a", "c", "e"]);
}

#[tokio::test]
async fn trailing_slash_reaches_collection() {
    let client = client().await;
    create(&client, "a", false).await;

    let list: Vec<Value> = client.get("/api/todo/").await.json();
    assert_eq!(list.len(), 1);
}

#[tokio::test]
async fn missing_or_unknown_token_is_401() {
    let client = client().await;

    let anonymous = client.clone().without_bearer().get("/api/todo").await;
    assert_eq!(anonymous.status(), 401);
    assert_eq!(anonymous.header("www-authenticate"), Some("Bearer"));

    let wrong = client.clone().with_bearer("nope").get("/api/todo").await;
    assert_eq!(wrong.status(), 401);

    let write = client
        .without_bearer()
        .post_json("/api/todo", &json!({ "name": "sneaky" }))
        .await;
    assert_eq!(write.status(), 401);
}

#[tokio::test]
async fn no_configured_tokens_rejects_everything() {
    let client = client_with(TodoConfig::default()).await;
    assert_eq!(client.get("/api/todo").await.status(), 401);
}

#[tokio::test]
async fn unknown_route_and_wrong_method() {
    let client = client().await;
    assert_eq!(client.get("/api/other").await.status(), 404);
    assert_eq!(
        client.send_raw("PATCH", "/api/todo/1", "{}").await.status(),
        405
    );
    assert_eq!(client.delete("/api/todo").await.status(), 405);
}
