//! Router-level tests for the file manager HTTP API.
//!
//! Requests go through the full middleware stack via `oneshot` against an
//! in-memory bucket.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use file_manager::build_router;
use file_manager::config::ServiceConfig;
use file_manager::error::{ErrorBody, INTERNAL_ERROR_MESSAGE};
use file_manager::service::UploadResponse;
use file_manager::state::AppState;
use storage::ObjectStorage;
use test_utils::{
    dir_entries, sample_zip, temp_test_dir, write_sample_tree, zip_slip_zip, SAMPLE_CONTENT,
};

const BOUNDARY: &str = "fm-test-boundary";

// ============================================================================
// Helpers
// ============================================================================

fn app_with_config(config: ServiceConfig) -> Router {
    let storage = Arc::new(ObjectStorage::in_memory("test-bucket"));
    let state = Arc::new(AppState::new(storage, &config, None));
    build_router(state, &config).unwrap()
}

fn app() -> Router {
    app_with_config(ServiceConfig::default())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// A multipart part: (field name, optional file name, content).
type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file_name {
            Some(file_name) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: application/zip\r\n\r\n");
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_zip(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    let body = multipart_body(parts);
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

fn error_body(body: &[u8]) -> ErrorBody {
    serde_json::from_slice(body).unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_and_ready() {
    let app = app();

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");

    let (status, body) = send(&app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["ready"], true);
}

#[tokio::test]
async fn test_metrics_without_recorder_is_unavailable() {
    let (status, _) = send(&app(), get("/metrics")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

// ============================================================================
// Directory upload, listing and retrieval
// ============================================================================

#[tokio::test]
async fn test_upload_directory_then_list_and_read() {
    let dir = temp_test_dir();
    write_sample_tree(dir.path());
    let app = app();

    let uri = format!(
        "/fileManager/upload?projectId=p1&localDir={}",
        dir.path().display()
    );
    let (status, body) = send(&app, post(&uri)).await;
    assert_eq!(status, StatusCode::OK);

    let response: UploadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.project_id, "p1");
    assert_eq!(response.upload_results.len(), 3);
    assert_eq!(response.upload_results["projects/p1/file1.txt"], "Uploaded");

    let (status, body) = send(&app, get("/fileManager/files?projectId=p1")).await;
    assert_eq!(status, StatusCode::OK);
    let mut keys: Vec<String> = serde_json::from_slice(&body).unwrap();
    keys.sort();
    assert_eq!(
        keys,
        vec![
            "projects/p1/file1.txt",
            "projects/p1/nested/deeper/file3.txt",
            "projects/p1/nested/file2.txt",
        ]
    );

    let response = app
        .clone()
        .oneshot(get("/fileManager/file?projectId=p1&filePath=file1.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], SAMPLE_CONTENT.as_bytes());
}

#[tokio::test]
async fn test_every_listed_path_can_be_read() {
    let dir = temp_test_dir();
    let names = ["notes#1.txt", "backup~", "50%.txt", "draft [v2].md", "a&b=c.txt"];
    for name in names {
        std::fs::write(dir.path().join(name), name).unwrap();
    }
    let app = app();

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("projectId", "p1")
        .append_pair("localDir", &dir.path().display().to_string())
        .finish();
    let (status, body) = send(&app, post(&format!("/fileManager/upload?{}", query))).await;
    assert_eq!(status, StatusCode::OK);
    let response: UploadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.upload_results.len(), names.len());

    let (status, body) = send(&app, get("/fileManager/files?projectId=p1")).await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<String> = serde_json::from_slice(&body).unwrap();
    assert_eq!(keys.len(), names.len());

    for key in keys {
        let file_path = key.strip_prefix("projects/p1/").unwrap();
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("projectId", "p1")
            .append_pair("filePath", file_path)
            .finish();
        let (status, body) = send(&app, get(&format!("/fileManager/file?{}", query))).await;
        assert_eq!(status, StatusCode::OK, "GET {} failed", key);
        assert_eq!(body, file_path.as_bytes());
    }
}

#[tokio::test]
async fn test_upload_directory_generates_project_id() {
    let dir = temp_test_dir();
    write_sample_tree(dir.path());
    let app = app();

    let uri = format!("/fileManager/upload?localDir={}", dir.path().display());
    let (status, body) = send(&app, post(&uri)).await;
    assert_eq!(status, StatusCode::OK);

    let response: UploadResponse = serde_json::from_slice(&body).unwrap();
    assert!(uuid_like(&response.project_id));
    let prefix = format!("projects/{}/", response.project_id);
    assert!(response
        .upload_results
        .keys()
        .all(|key| key.starts_with(&prefix)));
}

#[tokio::test]
async fn test_upload_directory_missing_dir_is_bad_request() {
    let (status, body) = send(&app(), post("/fileManager/upload?projectId=p1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = error_body(&body);
    assert_eq!(error.status, 400);
    assert_eq!(error.error, "Bad Request");
    assert_eq!(error.message, "Invalid local directory: ");
}

#[tokio::test]
async fn test_list_without_project_id_is_bad_request() {
    let (status, body) = send(&app(), get("/fileManager/files")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_body(&body).message,
        "Project ID cannot be null or empty."
    );
}

#[tokio::test]
async fn test_list_unknown_project_is_not_found() {
    let (status, body) = send(&app(), get("/fileManager/files?projectId=nobody")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let error = error_body(&body);
    assert_eq!(error.status, 404);
    assert_eq!(error.error, "Not Found");
    assert_eq!(error.message, "No files found for project ID: nobody");
}

#[tokio::test]
async fn test_get_missing_file_is_not_found() {
    let (status, body) = send(
        &app(),
        get("/fileManager/file?projectId=p1&filePath=missing.txt"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_body(&body).message, "File not found: missing.txt");
}

#[tokio::test]
async fn test_get_without_file_path_is_bad_request() {
    let (status, body) = send(&app(), get("/fileManager/file?projectId=p1")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_body(&body).message, "File path cannot be null or empty.");
    assert_ne!(error_body(&body).message, INTERNAL_ERROR_MESSAGE);
}

// ============================================================================
// Archive upload
// ============================================================================

#[tokio::test]
async fn test_upload_zip_with_project_field() {
    let scratch = temp_test_dir();
    let config = ServiceConfig {
        temp_dir: Some(scratch.path().to_path_buf()),
        ..Default::default()
    };
    let app = app_with_config(config);
    let zip = sample_zip();

    let request = upload_zip(
        "/fileManager/upload-zip",
        &[
            ("projectId", None, &b"p2"[..]),
            ("file", Some("test.zip"), &zip[..]),
        ],
    );
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let response: UploadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.project_id, "p2");
    assert_eq!(
        response.upload_results.keys().collect::<Vec<_>>(),
        vec!["projects/p2/test.txt"]
    );
    assert!(dir_entries(scratch.path()).is_empty());

    let (status, body) = send(&app, get("/fileManager/file?projectId=p2&filePath=test.txt")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, SAMPLE_CONTENT.as_bytes());
}

#[tokio::test]
async fn test_upload_zip_query_project_id_wins() {
    let zip = sample_zip();
    let request = upload_zip(
        "/fileManager/upload-zip?projectId=from-query",
        &[
            ("projectId", None, &b"from-field"[..]),
            ("file", Some("test.zip"), &zip[..]),
        ],
    );

    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let response: UploadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.project_id, "from-query");
}

#[tokio::test]
async fn test_upload_zip_blank_query_project_id_uses_field() {
    let zip = sample_zip();
    let request = upload_zip(
        "/fileManager/upload-zip?projectId=",
        &[
            ("projectId", None, &b"p3"[..]),
            ("file", Some("test.zip"), &zip[..]),
        ],
    );

    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let response: UploadResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.project_id, "p3");
    assert!(response.upload_results.contains_key("projects/p3/test.txt"));
}

#[tokio::test]
async fn test_upload_zip_blank_field_generates_project_id() {
    let zip = sample_zip();
    let request = upload_zip(
        "/fileManager/upload-zip",
        &[
            ("projectId", None, &b"  "[..]),
            ("file", Some("test.zip"), &zip[..]),
        ],
    );

    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let response: UploadResponse = serde_json::from_slice(&body).unwrap();
    assert!(uuid_like(&response.project_id));
}

#[tokio::test]
async fn test_upload_zip_generates_project_id() {
    let zip = sample_zip();
    let request = upload_zip("/fileManager/upload-zip", &[("file", Some("test.zip"), &zip[..])]);

    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::OK);
    let response: UploadResponse = serde_json::from_slice(&body).unwrap();
    assert!(uuid_like(&response.project_id));
}

#[tokio::test]
async fn test_upload_zip_without_file_is_bad_request() {
    let request = upload_zip("/fileManager/upload-zip", &[("projectId", None, &b"p1"[..])]);

    let (status, body) = send(&app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_body(&body).message,
        "Uploaded ZIP file is null or empty."
    );
}

#[tokio::test]
async fn test_upload_zip_slip_is_rejected() {
    let scratch = temp_test_dir();
    let config = ServiceConfig {
        temp_dir: Some(scratch.path().to_path_buf()),
        ..Default::default()
    };
    let app = app_with_config(config);
    let zip = zip_slip_zip();

    let request = upload_zip(
        "/fileManager/upload-zip?projectId=p1",
        &[("file", Some("evil.zip"), &zip[..])],
    );
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_body(&body).message,
        "Invalid ZIP entry: ../../etc/passwd"
    );
    assert!(dir_entries(scratch.path()).is_empty());

    let (status, _) = send(&app, get("/fileManager/files?projectId=p1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_over_limit_is_rejected() {
    let config = ServiceConfig {
        max_upload_bytes: 64,
        ..Default::default()
    };
    let app = app_with_config(config);
    let zip = sample_zip();

    let request = upload_zip("/fileManager/upload-zip", &[("file", Some("test.zip"), &zip[..])]);
    let (status, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

// ============================================================================
// CORS
// ============================================================================

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/fileManager/files")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

fn uuid_like(id: &str) -> bool {
    id.len() == 36 && id.chars().filter(|c| *c == '-').count() == 4
}
