//! Share handlers: upload, status, download and QR code.

use axum::{
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::share::{admit, hash_password, Admission, FileRecordRepository, NewFileRecord};
use crate::web::dto::{ApiResponse, DownloadQuery, ShareStatusResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::qr;

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Sanitizes the filename to prevent header injection and uses RFC 5987
/// encoding for non-ASCII filenames.
fn content_disposition_header(filename: &str) -> String {
    // ASCII fallback with control characters and quoting hazards removed
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' => '_',
            '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    // RFC 5987 filename* parameter with UTF-8 encoding
    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// POST /api/upload - Upload a file and create a share.
///
/// Request body: multipart/form-data with a "file" field and an optional
/// "password" field.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "shares",
    request_body(content = String, content_type = "multipart/form-data",
        description = "Multipart form with a `file` part and optional `password` part"),
    responses(
        (status = 200, description = "Share created", body = UploadResponse),
        (status = 400, description = "Invalid input or file too large")
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>, ApiError> {
    let mut filename: Option<String> = None;
    let mut password: Option<String> = None;
    let mut content: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                content = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| {
                            tracing::error!("Failed to read file content: {}", e);
                            ApiError::bad_request("Failed to read file")
                        })?
                        .to_vec(),
                );
            }
            "password" => {
                password = Some(field.text().await.map_err(|e| {
                    tracing::error!("Failed to read password field: {}", e);
                    ApiError::bad_request("Invalid password field")
                })?);
            }
            _ => {}
        }
    }

    let filename = filename.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let content = content.ok_or_else(|| ApiError::bad_request("No file content"))?;

    if content.is_empty() {
        return Err(ApiError::bad_request("File is empty"));
    }

    if content.len() as u64 > state.max_upload_size {
        let max_mb = state.max_upload_size / 1024 / 1024;
        return Err(ApiError::bad_request(format!(
            "File too large (max {}MB)",
            max_mb
        )));
    }

    // Empty password means no gate, same rule as on the download side
    let password_hash = match password.as_deref().filter(|p| !p.is_empty()) {
        Some(p) => Some(hash_password(p).map_err(|e| ApiError::bad_request(e.to_string()))?),
        None => None,
    };

    let stored_name = state.storage.save(&content, &filename).map_err(|e| {
        tracing::error!("Failed to save upload: {}", e);
        ApiError::internal("Failed to save file")
    })?;

    let record = {
        let repo = FileRecordRepository::new(state.db.pool());

        let mut new_record = NewFileRecord::new(&stored_name, &filename);
        if let Some(hash) = password_hash {
            new_record = new_record.with_password_hash(hash);
        }

        match repo.create_with_unique_code(new_record).await {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Failed to create file record: {}", e);
                // Don't leave an orphaned blob behind
                let _ = state.storage.delete(&stored_name);
                return Err(ApiError::internal("Failed to create share"));
            }
        }
    };

    tracing::info!(
        file_id = record.id,
        access_code = %record.access_code,
        "Share created"
    );

    let response = UploadResponse {
        id: record.id,
        access_code: record.access_code.clone(),
        original_name: record.original_name.clone(),
        password_required: record.password_required(),
        download_url: qr::share_url(&state.base_url, record.id),
        qr_url: format!("{}/api/files/{}/qr", state.base_url.trim_end_matches('/'), record.id),
        remaining_downloads: record.remaining_downloads(),
    };

    Ok(Json(ApiResponse::new(response)))
}

/// GET /api/files/:identity - Share status.
///
/// Resolves an access code or internal id; never consumes a download slot.
#[utoipa::path(
    get,
    path = "/api/files/{identity}",
    tag = "shares",
    params(
        ("identity" = String, Path, description = "Access code or internal id")
    ),
    responses(
        (status = 200, description = "Share status", body = ShareStatusResponse),
        (status = 404, description = "File not found")
    )
)]
pub async fn share_status(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
) -> Result<Json<ApiResponse<ShareStatusResponse>>, ApiError> {
    let repo = FileRecordRepository::new(state.db.pool());

    let record = repo
        .resolve(&identity)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve share: {}", e);
            ApiError::internal("Failed to resolve share")
        })?
        .ok_or_else(ApiError::not_found)?;

    let created_at = record.created_at_datetime().map_err(|e| {
        tracing::error!(file_id = record.id, "Corrupt created_at timestamp: {}", e);
        ApiError::internal("Failed to resolve share")
    })?;

    let response = ShareStatusResponse {
        original_name: record.original_name.clone(),
        password_required: record.password_required(),
        remaining_downloads: record.remaining_downloads(),
        created_at: created_at.to_rfc3339(),
    };

    Ok(Json(ApiResponse::new(response)))
}

/// GET /api/files/:identity/download - Download a shared file.
///
/// Also served as GET /file/:identity, the path shareable links point at.
/// Passing `?password=` supplies the gate password for protected shares.
#[utoipa::path(
    get,
    path = "/api/files/{identity}/download",
    tag = "shares",
    params(
        ("identity" = String, Path, description = "Access code or internal id"),
        ("password" = Option<String>, Query, description = "Password for gated shares")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 401, description = "Password required or rejected"),
        (status = 404, description = "File not found"),
        (status = 410, description = "Download limit reached")
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response<Body>, ApiError> {
    let outcome = admit(state.db.pool(), &identity, query.password.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Admission failed: {}", e);
            ApiError::internal("Failed to process download")
        })?;

    let record = match outcome {
        Admission::Granted(record) => record,
        Admission::NotFound => return Err(ApiError::not_found()),
        Admission::QuotaExceeded => return Err(ApiError::limit_reached()),
        Admission::NeedsPassword => return Err(ApiError::password_required()),
        Admission::PasswordRejected => return Err(ApiError::password_rejected()),
    };

    // The slot is already debited; a failed read here doesn't refund it.
    // The quota guards access, not completed transfers.
    let content = state.storage.load(&record.stored_name).map_err(|e| {
        tracing::error!("Failed to load blob: {}", e);
        ApiError::internal("Failed to load file")
    })?;

    tracing::info!(
        file_id = record.id,
        download_count = record.download_count,
        "Download granted"
    );

    let content_type = mime_guess::from_path(&record.original_name)
        .first_or_octet_stream()
        .to_string();

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&record.original_name),
        )
        .header(header::CONTENT_LENGTH, content.len())
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// GET /api/files/:identity/qr - QR code for the shareable link.
#[utoipa::path(
    get,
    path = "/api/files/{identity}/qr",
    tag = "shares",
    params(
        ("identity" = String, Path, description = "Access code or internal id")
    ),
    responses(
        (status = 200, description = "QR code image", content_type = "image/svg+xml"),
        (status = 404, description = "File not found")
    )
)]
pub async fn share_qr(
    State(state): State<Arc<AppState>>,
    Path(identity): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let repo = FileRecordRepository::new(state.db.pool());

    let record = repo
        .resolve(&identity)
        .await
        .map_err(|e| {
            tracing::error!("Failed to resolve share: {}", e);
            ApiError::internal("Failed to resolve share")
        })?
        .ok_or_else(ApiError::not_found)?;

    let url = qr::share_url(&state.base_url, record.id);
    let svg = qr::qr_svg(&url).map_err(|e| {
        tracing::error!("Failed to render QR code: {}", e);
        ApiError::internal("Failed to render QR code")
    })?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, "image/svg+xml")
        .body(Body::from(svg))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii() {
        let header = content_disposition_header("report.pdf");
        assert_eq!(header, "attachment; filename=\"report.pdf\"");
    }

    #[test]
    fn test_content_disposition_strips_injection() {
        let header = content_disposition_header("evil\r\nSet-Cookie: x=1.txt");
        assert!(!header.contains('\r'));
        assert!(!header.contains('\n'));
    }

    #[test]
    fn test_content_disposition_quotes_replaced() {
        let header = content_disposition_header("na\"me.txt");
        assert!(header.contains("na_me.txt"));
    }

    #[test]
    fn test_content_disposition_unicode() {
        let header = content_disposition_header("資料.pdf");
        assert!(header.contains("filename*=UTF-8''"));
    }
}
