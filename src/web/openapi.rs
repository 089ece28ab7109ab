//! OpenAPI documentation for the Dropslot API.

use utoipa::OpenApi;

use super::dto::{ShareStatusResponse, UploadResponse};
use super::error::ErrorCode;
use super::handlers;

/// OpenAPI document for the share API.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::share::upload_file,
        handlers::share::share_status,
        handlers::share::download_file,
        handlers::share::share_qr,
    ),
    components(schemas(UploadResponse, ShareStatusResponse, ErrorCode)),
    tags(
        (name = "shares", description = "Ephemeral file shares")
    ),
    info(
        title = "Dropslot API",
        description = "Ephemeral file sharing: upload, share via code or QR link, limited downloads"
    )
)]
pub struct ApiDoc;
