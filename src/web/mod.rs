//! Web API module for Dropslot.
//!
//! REST API for uploading shares and retrieving them by access code or
//! link, plus QR code rendering for shareable URLs.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod qr;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
