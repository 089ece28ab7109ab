//! Download admission.
//!
//! Decides the outcome of a retrieval request: serve the file and consume
//! a download slot, ask for a password, or reject. All state lives in the
//! file record; the only mutation is the atomic slot consumption, which is
//! deferred until after password verification so failed password attempts
//! never burn a slot.

use sqlx::SqlitePool;

use super::password::{verify_password, PasswordError};
use super::record::{FileRecord, FileRecordRepository};
use crate::{DropslotError, Result};

/// Downloads allowed per share.
pub const MAX_DOWNLOADS: i64 = 3;

/// Outcome of one retrieval attempt.
#[derive(Debug)]
pub enum Admission {
    /// Serve the file; one slot has been consumed.
    Granted(FileRecord),
    /// No record matches the identity.
    NotFound,
    /// The download quota is used up.
    QuotaExceeded,
    /// The share is password gated and no password was submitted.
    NeedsPassword,
    /// A password was submitted but does not match. No slot consumed.
    PasswordRejected,
}

impl Admission {
    /// Whether this outcome grants access to the file.
    pub fn is_granted(&self) -> bool {
        matches!(self, Admission::Granted(_))
    }
}

/// Decide a retrieval request.
///
/// `raw_identity` is an access code or internal id (id takes precedence
/// when the value matches both formats). A submitted empty password is
/// treated the same as no password.
///
/// Concurrent requests against the same record are serialized only by the
/// store-level conditional update in
/// [`FileRecordRepository::try_consume_slot`]; with k slots left and N
/// concurrent eligible callers, exactly min(N, k) are granted.
pub async fn admit(
    pool: &SqlitePool,
    raw_identity: &str,
    password: Option<&str>,
) -> Result<Admission> {
    let repo = FileRecordRepository::new(pool);

    let record = match repo.resolve(raw_identity).await? {
        Some(record) => record,
        None => return Ok(Admission::NotFound),
    };

    // Cheap pre-check; the conditional update below stays authoritative.
    if record.is_exhausted() {
        return Ok(Admission::QuotaExceeded);
    }

    let password = password.filter(|p| !p.is_empty());

    if let Some(ref hash) = record.password_hash {
        let submitted = match password {
            Some(p) => p,
            None => return Ok(Admission::NeedsPassword),
        };

        match verify_password(submitted, hash) {
            Ok(()) => {}
            Err(PasswordError::VerificationFailed) => {
                return Ok(Admission::PasswordRejected);
            }
            Err(e) => {
                // Stored hash is unreadable; a data problem, not a wrong password
                return Err(DropslotError::Database(format!(
                    "stored password hash for file {}: {e}",
                    record.id
                )));
            }
        }
    }

    match repo.try_consume_slot(record.id).await? {
        Some(updated) => Ok(Admission::Granted(updated)),
        // A concurrent winner took the last slot between the pre-check
        // and the update.
        None => Ok(Admission::QuotaExceeded),
    }
}
