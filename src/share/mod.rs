//! File sharing core for Dropslot.
//!
//! Covers the persistent file record, access code generation, password
//! gating and the download admission decision.

mod admission;
mod code;
mod password;
mod record;

pub use admission::{admit, Admission, MAX_DOWNLOADS};
pub use code::{generate_access_code, ACCESS_CODE_ALPHABET, ACCESS_CODE_LENGTH};
pub use password::{hash_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH};
pub use record::{FileRecord, FileRecordRepository, Identity, NewFileRecord};
