//! Integration tests for the LessonPress HTTP API.

mod support;

use axum::http::{header, HeaderValue, StatusCode};
use serde_json::json;
use support::{file_hash, setup_test_server, test_config_for_root, test_server_for_config};

fn dev_origin() -> HeaderValue {
    HeaderValue::from_static(support::DEV_ORIGIN)
}

#[tokio::test]
async fn test_create_then_read_back() {
    let (server, temp) = setup_test_server();

    let response = server
        .post("/api/articles/save")
        .add_header(header::ORIGIN, dev_origin())
        .json(&json!({
            "mode": "create",
            "articleData": {
                "headline": "Man Swallowed By Whale",
                "slug": "man-swallowed-by-whale",
                "level1Text": "A man survived three days inside a whale.",
                "topic": "animals"
            }
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["id"], "rec002");
    assert_eq!(body["mode"], "create");
    assert_eq!(body["requiresReload"], true);
    assert!(body.get("warnings").is_none());

    let record = server
        .get("/api/articles/rec002")
        .add_header(header::ORIGIN, dev_origin())
        .await;
    assert_eq!(record.status_code(), StatusCode::OK);
    let record: serde_json::Value = record.json();
    assert_eq!(record["fields"]["Headline"], "Man Swallowed By Whale");
    assert_eq!(
        record["fields"]["Level 1 Instruction"],
        "Write a full sentence to answer each question."
    );
    assert_eq!(record["fields"]["Level 3 Instruction"], "");

    let topics =
        std::fs::read_to_string(temp.path().join("articleTopics.js")).expect("read topics");
    assert!(topics.contains("'man-swallowed-by-whale': 'animals'"));
}

#[tokio::test]
async fn test_update_preserves_other_records() {
    let (server, temp) = setup_test_server();
    let source_path = temp.path().join("newsData.js");
    let before = std::fs::read_to_string(&source_path).expect("read");

    let response = server
        .post("/api/articles/save")
        .add_header(header::ORIGIN, dev_origin())
        .json(&json!({
            "mode": "update",
            "articleData": { "id": "rec250", "headline": "Renamed" }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], "rec250");
    assert_eq!(body["mode"], "update");

    let after = std::fs::read_to_string(&source_path).expect("read");
    assert_eq!(
        after,
        before.replace("\"Headline\": \"Out Of Band\"", "\"Headline\": \"Renamed\"")
    );
}

#[tokio::test]
async fn test_list_articles_in_file_order() {
    let (server, _temp) = setup_test_server();
    let response = server
        .get("/api/articles")
        .add_header(header::ORIGIN, dev_origin())
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let list: serde_json::Value = response.json();
    assert_eq!(
        list,
        json!([
            { "id": "rec001", "headline": "First Story", "slug": "first-story" },
            { "id": "rec250", "headline": "Out Of Band", "slug": "out-of-band" }
        ])
    );
    response.assert_header("x-content-type-options", "nosniff");
}

#[tokio::test]
async fn test_access_gate_rejects_foreign_origin_and_production() {
    let (server, temp) = setup_test_server();
    let source_path = temp.path().join("newsData.js");
    let before = file_hash(&source_path);
    let request = json!({
        "mode": "create",
        "articleData": { "headline": "Nope", "slug": "nope" }
    });

    let missing = server.post("/api/articles/save").json(&request).await;
    assert_eq!(missing.status_code(), StatusCode::FORBIDDEN);

    let foreign = server
        .post("/api/articles/save")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://example.com"))
        .json(&request)
        .await;
    assert_eq!(foreign.status_code(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = foreign.json();
    assert!(body["error"].as_str().expect("error").contains("not allowed"));

    let mut config = test_config_for_root(temp.path());
    config.environment = "production".to_string();
    let production = test_server_for_config(config);
    let denied = production
        .post("/api/articles/save")
        .add_header(header::ORIGIN, dev_origin())
        .json(&request)
        .await;
    assert_eq!(denied.status_code(), StatusCode::FORBIDDEN);
    let listing = production
        .get("/api/articles")
        .add_header(header::ORIGIN, dev_origin())
        .await;
    assert_eq!(listing.status_code(), StatusCode::FORBIDDEN);

    assert_eq!(file_hash(&source_path), before);
}

#[tokio::test]
async fn test_validation_errors_are_bad_request() {
    let (server, temp) = setup_test_server();
    let source_path = temp.path().join("newsData.js");
    let before = file_hash(&source_path);

    let cases = [
        json!({ "mode": "create", "articleData": { "headline": "No slug" } }),
        json!({ "mode": "update", "articleData": { "headline": "No id" } }),
        json!({ "mode": "create" }),
        json!({ "articleData": { "headline": "x", "slug": "y" } }),
        json!({ "mode": "delete", "articleData": { "id": "rec001" } }),
    ];
    for request in cases {
        let response = server
            .post("/api/articles/save")
            .add_header(header::ORIGIN, dev_origin())
            .json(&request)
            .await;
        assert_eq!(
            response.status_code(),
            StatusCode::BAD_REQUEST,
            "request: {}",
            request
        );
        let body: serde_json::Value = response.json();
        assert!(body["error"].is_string());
    }

    assert_eq!(file_hash(&source_path), before);
}

#[tokio::test]
async fn test_unknown_id_is_not_found_and_file_unchanged() {
    let (server, temp) = setup_test_server();
    let source_path = temp.path().join("newsData.js");
    let before = file_hash(&source_path);

    let response = server
        .post("/api/articles/save")
        .add_header(header::ORIGIN, dev_origin())
        .json(&json!({
            "mode": "update",
            "articleData": { "id": "rec404", "headline": "Ghost" }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Article with id 'rec404' not found");
    assert_eq!(file_hash(&source_path), before);

    let missing = server
        .get("/api/articles/rec404")
        .add_header(header::ORIGIN, dev_origin())
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_source_is_not_found() {
    let (server, temp) = setup_test_server();
    std::fs::write(
        temp.path().join("newsData.js"),
        "export const newsData = [ { id: 'rec001', fields: { \"Headline\": 7 } } ];\n",
    )
    .expect("corrupt source");

    let response = server
        .post("/api/articles/save")
        .add_header(header::ORIGIN, dev_origin())
        .json(&json!({
            "mode": "update",
            "articleData": { "id": "rec001", "headline": "x" }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json();
    assert!(body["error"]
        .as_str()
        .expect("error")
        .starts_with("Unexpected source file structure"));
}

#[tokio::test]
async fn test_file_location_selects_source_file() {
    let (server, temp) = setup_test_server();
    std::fs::create_dir(temp.path().join("archive")).expect("mkdir");
    std::fs::write(
        temp.path().join("archive/old.js"),
        "export const newsData = [\n];\n",
    )
    .expect("write archive");

    let response = server
        .post("/api/articles/save")
        .add_header(header::ORIGIN, dev_origin())
        .json(&json!({
            "mode": "create",
            "fileLocation": "archive/old.js",
            "articleData": { "headline": "Archived", "slug": "archived" }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], "rec001");

    let listing = server
        .get("/api/articles")
        .add_query_param("fileLocation", "archive/old.js")
        .add_header(header::ORIGIN, dev_origin())
        .await;
    let list: serde_json::Value = listing.json();
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let escaping = server
        .post("/api/articles/save")
        .add_header(header::ORIGIN, dev_origin())
        .json(&json!({
            "mode": "create",
            "fileLocation": "../elsewhere.js",
            "articleData": { "headline": "x", "slug": "y" }
        }))
        .await;
    assert_eq!(escaping.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_sidecar_is_warning_not_failure() {
    let (server, temp) = setup_test_server();
    std::fs::remove_file(temp.path().join("articleTopics.js")).expect("remove sidecar");

    let response = server
        .post("/api/articles/save")
        .add_header(header::ORIGIN, dev_origin())
        .json(&json!({
            "mode": "update",
            "articleData": { "id": "rec001", "topic": "science", "headline": "Kept" }
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["warnings"].as_array().map(Vec::len), Some(1));
}
