//! Web API share tests.
//!
//! Integration tests for the upload / status / download / QR endpoints,
//! covering the full admission flow over HTTP.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::Value;
use std::sync::Arc;

use dropslot::web::handlers::AppState;
use dropslot::web::router::{create_health_router, create_router};
use dropslot::{BlobStorage, Database, MAX_DOWNLOADS};

/// Create a test server with an in-memory database and temp blob storage.
///
/// The TempDir is returned so it outlives the server.
async fn create_test_server() -> (TestServer, Arc<Database>, tempfile::TempDir) {
    let storage_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let shared_db = Arc::new(db);

    let storage = BlobStorage::new(storage_dir.path()).expect("Failed to create storage");

    let app_state = Arc::new(AppState::new(
        shared_db.clone(),
        storage,
        "http://localhost:8080",
        1024 * 1024, // 1 MB for tests
    ));

    let router = create_router(app_state, &[]).merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");

    (server, shared_db, storage_dir)
}

/// Upload a file, optionally with a password, and return the response JSON.
async fn upload(server: &TestServer, filename: &str, content: &[u8], password: Option<&str>) -> Value {
    let mut form = MultipartForm::new().add_part(
        "file",
        Part::bytes(content.to_vec()).file_name(filename),
    );
    if let Some(p) = password {
        form = form.add_text("password", p);
    }

    let response = server.post("/api/upload").multipart(form).await;
    response.assert_status_ok();
    response.json::<Value>()
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (server, _db, _dir) = create_test_server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_upload_returns_share_details() {
    let (server, _db, _dir) = create_test_server().await;

    let body = upload(&server, "report.txt", b"file contents", None).await;
    let data = &body["data"];

    assert!(data["id"].as_i64().unwrap() > 0);
    let code = data["access_code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert!(code
        .bytes()
        .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    assert_eq!(data["original_name"], "report.txt");
    assert_eq!(data["password_required"], false);
    assert_eq!(data["remaining_downloads"], MAX_DOWNLOADS);

    let id = data["id"].as_i64().unwrap();
    assert_eq!(
        data["download_url"].as_str().unwrap(),
        format!("http://localhost:8080/file/{id}")
    );
    assert!(data["qr_url"].as_str().unwrap().contains(&format!("/api/files/{id}/qr")));
}

#[tokio::test]
async fn test_upload_requires_file() {
    let (server, _db, _dir) = create_test_server().await;

    let form = MultipartForm::new().add_text("password", "secret");
    let response = server.post("/api/upload").multipart(form).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_upload_too_large() {
    let (server, _db, _dir) = create_test_server().await;

    let big = vec![0u8; 1536 * 1024]; // over the 1 MB test limit
    let form =
        MultipartForm::new().add_part("file", Part::bytes(big).file_name("big.bin"));
    let response = server.post("/api/upload").multipart(form).await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_download_by_access_code() {
    let (server, _db, _dir) = create_test_server().await;

    let body = upload(&server, "hello.txt", b"hello world", None).await;
    let code = body["data"]["access_code"].as_str().unwrap();

    let response = server.get(&format!("/api/files/{code}/download")).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"hello world");

    let disposition = response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.contains("hello.txt"));
}

#[tokio::test]
async fn test_download_via_share_link_path() {
    let (server, _db, _dir) = create_test_server().await;

    let body = upload(&server, "linked.txt", b"linked content", None).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let response = server.get(&format!("/file/{id}")).await;
    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"linked content");
}

#[tokio::test]
async fn test_download_quota_exhaustion() {
    let (server, _db, _dir) = create_test_server().await;

    let body = upload(&server, "limited.txt", b"limited", None).await;
    let code = body["data"]["access_code"].as_str().unwrap();

    for _ in 0..MAX_DOWNLOADS {
        let response = server.get(&format!("/api/files/{code}/download")).await;
        response.assert_status_ok();
    }

    let response = server.get(&format!("/api/files/{code}/download")).await;
    response.assert_status(axum::http::StatusCode::GONE);
    assert_eq!(error_code(&response.json::<Value>()), "LIMIT_REACHED");
}

#[tokio::test]
async fn test_download_unknown_identity() {
    let (server, _db, _dir) = create_test_server().await;

    let response = server.get("/api/files/NOSUCH00/download").await;
    response.assert_status_not_found();

    let body = response.json::<Value>();
    assert_eq!(error_code(&body), "NOT_FOUND");
    // Uniform message: no hint whether the code ever existed
    assert_eq!(body["error"]["message"], "File not found");
}

#[tokio::test]
async fn test_password_flow() {
    let (server, _db, _dir) = create_test_server().await;

    let body = upload(&server, "gated.txt", b"gated content", Some("secret")).await;
    let data = &body["data"];
    assert_eq!(data["password_required"], true);
    let code = data["access_code"].as_str().unwrap();

    // No password -> first ask
    let response = server.get(&format!("/api/files/{code}/download")).await;
    response.assert_status_unauthorized();
    assert_eq!(error_code(&response.json::<Value>()), "PASSWORD_REQUIRED");

    // Wrong password -> retry prompt, no slot consumed
    let response = server
        .get(&format!("/api/files/{code}/download"))
        .add_query_param("password", "wrong")
        .await;
    response.assert_status_unauthorized();
    assert_eq!(error_code(&response.json::<Value>()), "PASSWORD_REJECTED");

    // Status still shows the full quota
    let response = server.get(&format!("/api/files/{code}")).await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["data"]["remaining_downloads"],
        MAX_DOWNLOADS
    );

    // Correct password -> granted, until the quota runs out
    for _ in 0..MAX_DOWNLOADS {
        let response = server
            .get(&format!("/api/files/{code}/download"))
            .add_query_param("password", "secret")
            .await;
        response.assert_status_ok();
        assert_eq!(response.as_bytes().as_ref(), b"gated content");
    }

    let response = server
        .get(&format!("/api/files/{code}/download"))
        .add_query_param("password", "secret")
        .await;
    response.assert_status(axum::http::StatusCode::GONE);
}

#[tokio::test]
async fn test_empty_password_treated_as_absent() {
    let (server, _db, _dir) = create_test_server().await;

    let body = upload(&server, "gated.txt", b"gated", Some("secret")).await;
    let code = body["data"]["access_code"].as_str().unwrap();

    let response = server
        .get(&format!("/api/files/{code}/download"))
        .add_query_param("password", "")
        .await;
    response.assert_status_unauthorized();
    assert_eq!(error_code(&response.json::<Value>()), "PASSWORD_REQUIRED");
}

#[tokio::test]
async fn test_upload_with_empty_password_is_ungated() {
    let (server, _db, _dir) = create_test_server().await;

    let body = upload(&server, "open.txt", b"open", Some("")).await;
    assert_eq!(body["data"]["password_required"], false);

    let code = body["data"]["access_code"].as_str().unwrap();
    let response = server.get(&format!("/api/files/{code}/download")).await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_share_status() {
    let (server, _db, _dir) = create_test_server().await;

    let body = upload(&server, "status.txt", b"status", None).await;
    let code = body["data"]["access_code"].as_str().unwrap();

    let response = server.get(&format!("/api/files/{code}")).await;
    response.assert_status_ok();

    let status = response.json::<Value>();
    assert_eq!(status["data"]["original_name"], "status.txt");
    assert_eq!(status["data"]["password_required"], false);
    assert_eq!(status["data"]["remaining_downloads"], MAX_DOWNLOADS);

    let created_at = status["data"]["created_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());

    // Status checks never consume slots
    let response = server.get(&format!("/api/files/{code}")).await;
    assert_eq!(
        response.json::<Value>()["data"]["remaining_downloads"],
        MAX_DOWNLOADS
    );
}

#[tokio::test]
async fn test_status_unknown_identity() {
    let (server, _db, _dir) = create_test_server().await;

    let response = server.get("/api/files/MISSING0").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_qr_code_endpoint() {
    let (server, _db, _dir) = create_test_server().await;

    let body = upload(&server, "qr.txt", b"qr target", None).await;
    let code = body["data"]["access_code"].as_str().unwrap();

    let response = server.get(&format!("/api/files/{code}/qr")).await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "image/svg+xml"
    );
    assert!(response.text().contains("<svg") || response.text().contains("<?xml"));
}

#[tokio::test]
async fn test_qr_unknown_identity() {
    let (server, _db, _dir) = create_test_server().await;

    let response = server.get("/api/files/MISSING0/qr").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_download_count_survives_wrong_password_spam() {
    let (server, db, _dir) = create_test_server().await;

    let body = upload(&server, "spam.txt", b"spam target", Some("secret")).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let code = body["data"]["access_code"].as_str().unwrap();

    for _ in 0..5 {
        let response = server
            .get(&format!("/api/files/{code}/download"))
            .add_query_param("password", "nope")
            .await;
        response.assert_status_unauthorized();
    }

    let repo = dropslot::FileRecordRepository::new(db.pool());
    let record = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(record.download_count, 0);
}
