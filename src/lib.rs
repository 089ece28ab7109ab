//! Dropslot - ephemeral file sharing.
//!
//! Upload a file, get a short access code, a shareable link and a QR code.
//! Each share allows a fixed number of downloads (3) and may be gated by a
//! password. Implemented as a small axum web service over SQLite.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod share;
pub mod storage;
pub mod web;

pub use config::Config;
pub use db::Database;
pub use error::{DropslotError, Result};
pub use share::{
    admit, generate_access_code, hash_password, verify_password, Admission, FileRecord,
    FileRecordRepository, Identity, NewFileRecord, PasswordError, ACCESS_CODE_ALPHABET,
    ACCESS_CODE_LENGTH, MAX_DOWNLOADS,
};
pub use storage::BlobStorage;
pub use web::WebServer;
