//! Request and response DTOs for the Web API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Response to a successful upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Internal record id.
    pub id: i64,
    /// Short access code a recipient can type.
    pub access_code: String,
    /// Original filename.
    pub original_name: String,
    /// Whether the share is gated by a password.
    pub password_required: bool,
    /// Shareable download link.
    pub download_url: String,
    /// URL of the QR code image for the download link.
    pub qr_url: String,
    /// Downloads allowed before the share expires.
    pub remaining_downloads: i64,
}

/// Share status, as seen by a recipient before downloading.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShareStatusResponse {
    /// Original filename.
    pub original_name: String,
    /// Whether a password must be submitted to download.
    pub password_required: bool,
    /// Download slots still available.
    pub remaining_downloads: i64,
    /// When the share was created, RFC 3339.
    pub created_at: String,
}

/// Query parameters for a download attempt.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Password for gated shares. An empty value counts as not submitted.
    pub password: Option<String>,
}
