//! API handlers for the Dropslot web layer.

pub mod share;

pub use share::*;

use std::sync::Arc;

use crate::storage::BlobStorage;
use crate::Database;

/// Shared database handle.
pub type SharedDatabase = Arc<Database>;

/// Application state shared across handlers.
pub struct AppState {
    /// Database handle.
    pub db: SharedDatabase,
    /// Blob storage for uploaded files.
    pub storage: BlobStorage,
    /// Public base URL used in shareable links.
    pub base_url: String,
    /// Maximum upload size in bytes.
    pub max_upload_size: u64,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        db: SharedDatabase,
        storage: BlobStorage,
        base_url: impl Into<String>,
        max_upload_size: u64,
    ) -> Self {
        Self {
            db,
            storage,
            base_url: base_url.into(),
            max_upload_size,
        }
    }
}
