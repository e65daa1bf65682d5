use airdesk::error::DeskError;
use airdesk::middleware::identity::encode_user_context;
use airdesk::service::generator::TitleGenerator;
use airdesk::types::tools::UserProfile;
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, request::Builder},
};
use serde_json::{Value, json};
use std::{
    fs,
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

const KEY: &str = "pwd";

struct FixedTitle(&'static str);

#[async_trait]
impl TitleGenerator for FixedTitle {
    async fn generate_title(&self) -> Result<String, DeskError> {
        Ok(self.0.to_string())
    }
}

struct TestApp {
    app: Router,
    db_path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.db_path);
        let _ = fs::remove_file(self.db_path.with_extension("sqlite-wal"));
        let _ = fs::remove_file(self.db_path.with_extension("sqlite-shm"));
    }
}

async fn spawn_app(title: &'static str) -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "airdesk-tool-routes-test-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));

    let database_url = format!("sqlite:{}", db_path.display());
    let pool = airdesk::db::connect(&database_url)
        .await
        .expect("failed to open test database");
    let state = airdesk::DeskState::new(pool, Arc::new(FixedTitle(title)), Arc::from(KEY));
    TestApp {
        app: airdesk::desk_router(state),
        db_path,
    }
}

fn with_bearer(builder: Builder) -> Builder {
    builder.header("authorization", format!("Bearer {KEY}"))
}

async fn call_tool(app: &Router, tool: &str, body: Option<Value>) -> (StatusCode, Value) {
    call_tool_with(app, tool, body, |b| b).await
}

async fn call_tool_with(
    app: &Router,
    tool: &str,
    body: Option<Value>,
    extra: impl FnOnce(Builder) -> Builder,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method("POST")
        .uri(format!("/tools/{tool}"))
        .header("content-type", "application/json")
        .header("x-desk-key", KEY);
    let body = match body {
        Some(v) => Body::from(v.to_string()),
        None => Body::empty(),
    };
    let resp = app
        .clone()
        .oneshot(extra(builder).body(body).expect("failed to build request"))
        .await
        .expect("request failed");

    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn tool_calls_require_the_desk_key() {
    let t = spawn_app("Anything").await;
    let resp = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tools/LIST_TODOS")
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
        .expect("request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = call_tool_with(&t.app, "LIST_TODOS", None, with_bearer).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn health_is_public_and_unknown_routes_404() {
    let t = spawn_app("Anything").await;
    let request = Request::builder().uri("/healthz").body(Body::empty());
    let resp = t.app.clone().oneshot(request.unwrap()).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = call_tool(&t.app, "NOT_A_TOOL", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "UNKNOWN_TOOL");
}

#[tokio::test]
async fn todo_lifecycle_over_http() {
    let t = spawn_app("Confirm crew roster").await;

    let (status, body) = call_tool(&t.app, "GENERATE_TODO_WITH_AI", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["todo"]["title"], "Confirm crew roster");
    assert_eq!(body["todo"]["completed"], false);
    let id = body["todo"]["id"].as_i64().expect("numeric id");

    let (_, body) = call_tool(&t.app, "TOGGLE_TODO", Some(json!({ "id": id }))).await;
    assert_eq!(body["todo"]["completed"], true);

    let (_, body) = call_tool(&t.app, "LIST_TODOS", Some(json!({}))).await;
    assert_eq!(body["todos"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["todos"][0]["completed"], true);

    let (status, body) = call_tool(&t.app, "DELETE_TODO", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "deletedId": id }));

    let (status, body) = call_tool(&t.app, "DELETE_TODO", Some(json!({ "id": id }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn empty_generated_title_is_a_generation_failure() {
    let t = spawn_app("   ").await;
    let (status, body) = call_tool(&t.app, "GENERATE_TODO_WITH_AI", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "GENERATION_FAILED");

    let (_, body) = call_tool(&t.app, "LIST_TODOS", None).await;
    assert_eq!(body["todos"], json!([]));
}

#[tokio::test]
async fn input_schema_violations_are_rejected() {
    let t = spawn_app("Anything").await;

    let (status, body) = call_tool(&t.app, "TOGGLE_TODO", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    let unknown_field = json!({ "flight": "BR0101" });
    let (status, _) = call_tool(&t.app, "GET_PASSENGERS", Some(unknown_field)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call_tool(&t.app, "LIST_TODOS", Some(json!({ "x": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn passenger_tools_over_http() {
    let t = spawn_app("Anything").await;

    let (status, body) = call_tool(&t.app, "CLEAR_DATABASE", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["deletedCount"], 0);

    let (_, body) = call_tool(&t.app, "GET_PASSENGER_STATS", None).await;
    assert_eq!(body["totalPassengers"], 0);
    assert_eq!(body["averagePrice"], 0.0);
    assert_eq!(body["byFlight"], json!({}));

    let (_, first) = call_tool(&t.app, "POPULATE_TEST_DATA", None).await;
    let loaded = first["importedCount"].as_u64().expect("count");
    assert!(loaded > 0);
    let (_, second) = call_tool(&t.app, "POPULATE_TEST_DATA", None).await;
    assert_eq!(second["success"], true);
    assert_eq!(second["importedCount"], 0);

    let filters = json!({ "flightNumber": "BR0101", "limit": 2 });
    let (_, body) = call_tool(&t.app, "GET_PASSENGERS", Some(filters)).await;
    let rows = body["passengers"].as_array().expect("passenger array");
    assert!(rows.len() <= 2);
    assert!(rows.iter().all(|p| p["flightNumber"] == "BR0101"));
    assert!(body["totalCount"].as_u64().unwrap() >= rows.len() as u64);

    let (_, stats) = call_tool(&t.app, "GET_PASSENGER_STATS", None).await;
    assert_eq!(stats["totalPassengers"].as_u64(), Some(loaded));

    let csv = "first_name,last_name,email\nEva,Lund,eva@example.com\n\nOla,Nord,ola@example.com\n";
    let (status, body) = call_tool(
        &t.app,
        "IMPORT_PASSENGERS_FROM_CSV",
        Some(json!({ "csvContent": csv })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["importedCount"], 2);

    let (_, body) = call_tool(&t.app, "CLEAR_DATABASE", None).await;
    assert_eq!(body["deletedCount"].as_u64(), Some(loaded + 2));
}

#[tokio::test]
async fn get_user_reads_identity_context() {
    let t = spawn_app("Anything").await;

    let (status, body) = call_tool(&t.app, "GET_USER", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHENTICATED");

    let user = UserProfile {
        id: "42".to_string(),
        name: "Rosa Lopez".to_string(),
        avatar: None,
        email: "rosa@example.com".to_string(),
    };
    let ctx = encode_user_context(&user).expect("encode context");
    let with_ctx = |b: Builder| b.header("x-user-context", ctx);
    let (status, body) = call_tool_with(&t.app, "GET_USER", None, with_ctx).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "42");
    assert_eq!(body["email"], "rosa@example.com");
}

#[tokio::test]
async fn tool_catalog_lists_schemas() {
    let t = spawn_app("Anything").await;
    let resp = t
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/tools")
                .header("x-desk-key", KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let catalog: Value = serde_json::from_slice(&bytes).unwrap();
    let names: Vec<&str> = catalog
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["name"].as_str())
        .collect();
    assert!(names.contains(&"GET_PASSENGER_STATS"));
    assert_eq!(names.len(), 10);
}
