//! Integration tests for the CodeBin snippet API.

mod support;

use axum::body::Bytes;
use axum::http::StatusCode;
use serde_json::{json, Value};
use support::{setup_test_server, setup_test_server_with};

fn violation_paths(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .map(|violation| violation["path"].as_str().expect("path").to_string())
        .collect()
}

#[tokio::test]
async fn test_snippet_create_then_fetch() {
    let (server, _temp) = setup_test_server();

    let create_response = server
        .post("/api/snippets")
        .json(&json!({
            "title": "Hello",
            "code": "print(1)",
            "language": "python"
        }))
        .await;

    assert_eq!(create_response.status_code(), StatusCode::CREATED);
    let created: Value = create_response.json();
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(created.as_object().map(|body| body.len()), Some(1));

    let get_response = server.get(&format!("/api/snippets/{}", id)).await;
    assert_eq!(get_response.status_code(), StatusCode::OK);
    let snippet: Value = get_response.json();
    assert_eq!(snippet["id"], id.as_str());
    assert_eq!(snippet["title"], "Hello");
    assert_eq!(snippet["code"], "print(1)");
    assert_eq!(snippet["language"], "python");
    assert!(snippet["createdAt"].is_string());
    assert_eq!(snippet["createdAt"], snippet["updatedAt"]);
}

#[tokio::test]
async fn test_every_language_round_trips() {
    let (server, _temp) = setup_test_server();

    for language in ["text", "javascript", "python", "java", "csharp", "php"] {
        let created: Value = server
            .post("/api/snippets")
            .json(&json!({ "title": language, "code": "x", "language": language }))
            .await
            .json();
        let id = created["id"].as_str().expect("id");
        let snippet: Value = server.get(&format!("/api/snippets/{}", id)).await.json();
        assert_eq!(snippet["language"], language);
    }
}

#[tokio::test]
async fn test_title_is_trimmed_and_escaped_before_storage() {
    let (server, _temp) = setup_test_server();

    let created: Value = server
        .post("/api/snippets")
        .json(&json!({
            "title": "  <script>alert('x')</script>  ",
            "code": "  <b>raw</b>  ",
            "language": " javascript "
        }))
        .await
        .json();
    let id = created["id"].as_str().expect("id");

    let snippet: Value = server.get(&format!("/api/snippets/{}", id)).await.json();
    assert_eq!(
        snippet["title"],
        "&lt;script&gt;alert(&#x27;x&#x27;)&lt;&#x2F;script&gt;"
    );
    assert_eq!(snippet["code"], "<b>raw</b>");
    assert_eq!(snippet["language"], "javascript");
}

#[tokio::test]
async fn test_empty_title_is_rejected() {
    let (server, _temp) = setup_test_server();

    let response = server
        .post("/api/snippets")
        .json(&json!({ "title": "", "code": "x", "language": "python" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(violation_paths(&body), vec!["title"]);
    assert_eq!(body["errors"][0]["msg"], "Invalid value");
    assert_eq!(body["errors"][0]["location"], "body");
}

#[tokio::test]
async fn test_unknown_language_is_rejected() {
    let (server, _temp) = setup_test_server();

    let response = server
        .post("/api/snippets")
        .json(&json!({ "title": "x", "code": "y", "language": "ruby" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(violation_paths(&body), vec!["language"]);
    assert_eq!(body["errors"][0]["value"], "ruby");
}

#[tokio::test]
async fn test_length_limits_report_the_offending_fields() {
    let (server, _temp) = setup_test_server();

    let response = server
        .post("/api/snippets")
        .json(&json!({
            "title": "t".repeat(101),
            "code": "c".repeat(10_001),
            "language": "text"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(violation_paths(&response.json()), vec!["title", "code"]);

    let response = server
        .post("/api/snippets")
        .json(&json!({
            "title": "t".repeat(100),
            "code": "c".repeat(10_000),
            "language": "text"
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_all_violations_are_reported_together() {
    let (server, _temp) = setup_test_server();

    let response = server.post("/api/snippets").json(&json!({})).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        violation_paths(&response.json()),
        vec!["title", "code", "language"]
    );
}

#[tokio::test]
async fn test_non_json_body_is_validated_as_empty() {
    let (server, _temp) = setup_test_server();

    let response = server.post("/api/snippets").text("title=x&code=y").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        violation_paths(&response.json()),
        vec!["title", "code", "language"]
    );
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let (server, _temp) = setup_test_server();

    let response = server
        .post("/api/snippets")
        .bytes(Bytes::from_static(b"{\"title\": \"x\", "))
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unknown_id_is_not_found() {
    let (server, _temp) = setup_test_server();

    let response = server
        .get("/api/snippets/00000000-0000-4000-8000-000000000000")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Snippet not found");
}

#[tokio::test]
async fn test_malformed_id_is_not_found() {
    let (server, _temp) = setup_test_server();

    for id in [
        "not-an-id",
        "507f1f77bcf86cd799439011",
        "%20",
        "12345",
        "%FF",
        "%C3%28",
    ] {
        let response = server.get(&format!("/api/snippets/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND, "id: {}", id);
        let body: Value = response.json();
        assert_eq!(body["error"], "Snippet not found", "id: {}", id);
    }
}

#[tokio::test]
async fn test_store_schema_rejection_surfaces_as_server_error() {
    let (server, _temp) = setup_test_server();

    // 100 ampersands pass validation but escape to 500 characters.
    let response = server
        .post("/api/snippets")
        .json(&json!({ "title": "&".repeat(100), "code": "x", "language": "text" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Error creating snippet");
    assert!(body["details"]
        .as_str()
        .expect("details in development")
        .contains("title"));
}

#[tokio::test]
async fn test_production_hides_error_details() {
    let (server, _temp, _limiter) = setup_test_server_with(|config| {
        config.deployment = codebin_server::DeploymentEnv::Production;
    });

    let response = server
        .post("/api/snippets")
        .json(&json!({ "title": "<".repeat(100), "code": "x", "language": "text" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Error creating snippet" }));
}

#[tokio::test]
async fn test_health_and_cors_check_endpoints() {
    let (server, _temp) = setup_test_server();

    let health = server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.json::<Value>(), json!({ "status": "OK" }));

    let cors_check = server.get("/api/test").await;
    assert_eq!(cors_check.status_code(), StatusCode::OK);
    assert_eq!(
        cors_check.json::<Value>(),
        json!({ "message": "CORS is working" })
    );
}

#[tokio::test]
async fn test_health_does_not_touch_the_store() {
    let (server, temp) = setup_test_server();

    // The open handle keeps serving even if the backing directory goes away.
    drop(temp);
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
}
