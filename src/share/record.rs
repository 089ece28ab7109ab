//! File record types and repository.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::SqlitePool;

use super::admission::MAX_DOWNLOADS;
use super::code::generate_access_code;
use crate::{DropslotError, Result};

/// One shared file.
///
/// Immutable after creation except for `download_count`, which is only
/// ever incremented by the atomic slot guard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FileRecord {
    /// Internal unique ID.
    pub id: i64,
    /// Blob locator inside the storage directory.
    pub stored_name: String,
    /// Filename suggested to the recipient on download.
    pub original_name: String,
    /// Argon2 hash of the gating password (None = no password).
    pub password_hash: Option<String>,
    /// Short public identifier, 8 chars from [A-Z0-9], globally unique.
    pub access_code: String,
    /// Number of downloads granted so far.
    pub download_count: i64,
    /// When the record was created.
    pub created_at: String,
    /// When the record was last updated.
    pub updated_at: String,
}

impl FileRecord {
    /// Whether this share is gated by a password.
    pub fn password_required(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Download slots still available.
    pub fn remaining_downloads(&self) -> i64 {
        (MAX_DOWNLOADS - self.download_count).max(0)
    }

    /// Whether the download quota has been used up.
    pub fn is_exhausted(&self) -> bool {
        self.download_count >= MAX_DOWNLOADS
    }

    /// Creation time parsed as UTC.
    ///
    /// `created_at` is written by SQLite's `datetime('now')`; a value
    /// that does not parse is a data error, not something to paper over.
    pub fn created_at_datetime(&self) -> Result<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.and_utc())
            .map_err(|e| {
                DropslotError::Validation(format!(
                    "invalid created_at '{}': {e}",
                    self.created_at
                ))
            })
    }
}

/// Data for creating a new file record.
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    /// Blob locator inside the storage directory.
    pub stored_name: String,
    /// Original filename.
    pub original_name: String,
    /// Access code (must be unique; see [`generate_access_code`]).
    pub access_code: String,
    /// Argon2 hash of the gating password, if any.
    pub password_hash: Option<String>,
}

impl NewFileRecord {
    /// Create a new NewFileRecord with a freshly generated access code.
    pub fn new(stored_name: impl Into<String>, original_name: impl Into<String>) -> Self {
        Self {
            stored_name: stored_name.into(),
            original_name: original_name.into(),
            access_code: generate_access_code(),
            password_hash: None,
        }
    }

    /// Use a specific access code instead of a generated one.
    pub fn with_access_code(mut self, access_code: impl Into<String>) -> Self {
        self.access_code = access_code.into();
        self
    }

    /// Gate the share with an already-hashed password.
    pub fn with_password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = Some(password_hash.into());
        self
    }

    /// Regenerate the access code (after a collision).
    pub fn regenerate_access_code(&mut self) {
        self.access_code = generate_access_code();
    }
}

/// How a retrieval request names a record.
///
/// A raw value can syntactically match both the internal id format and
/// the access code format; resolution order is fixed so the precedence
/// rule stays auditable: id lookup first, access code second.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Internal record id.
    ById(i64),
    /// Public access code.
    ByAccessCode(String),
}

impl Identity {
    /// Ordered lookup candidates for a raw identity string.
    pub fn candidates(raw: &str) -> Vec<Identity> {
        let mut candidates = Vec::with_capacity(2);
        if let Ok(id) = raw.parse::<i64>() {
            candidates.push(Identity::ById(id));
        }
        candidates.push(Identity::ByAccessCode(raw.to_string()));
        candidates
    }
}

/// Repository for file record operations.
pub struct FileRecordRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRecordRepository<'a> {
    /// Create a new FileRecordRepository with the given database pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new file record.
    ///
    /// Fails with [`DropslotError::DuplicateAccessCode`] when the access
    /// code collides with an existing record.
    pub async fn create(&self, record: &NewFileRecord) -> Result<FileRecord> {
        let result = sqlx::query(
            "INSERT INTO files (stored_name, original_name, password_hash, access_code)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&record.stored_name)
        .bind(&record.original_name)
        .bind(&record.password_hash)
        .bind(&record.access_code)
        .execute(self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DropslotError::NotFound("file".to_string()))
    }

    /// Create a record, regenerating the access code on collision.
    ///
    /// The 36^8 code space makes collisions rare; the bounded retry loop
    /// exists for correctness, not as an optimization.
    pub async fn create_with_unique_code(&self, mut record: NewFileRecord) -> Result<FileRecord> {
        const MAX_ATTEMPTS: usize = 16;

        for attempt in 0..MAX_ATTEMPTS {
            match self.create(&record).await {
                Ok(created) => return Ok(created),
                Err(DropslotError::DuplicateAccessCode) => {
                    tracing::debug!(
                        attempt = attempt + 1,
                        "Access code collision, regenerating"
                    );
                    record.regenerate_access_code();
                }
                Err(e) => return Err(e),
            }
        }

        Err(DropslotError::Database(
            "could not generate a unique access code".to_string(),
        ))
    }

    /// Get a record by internal ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(
            "SELECT id, stored_name, original_name, password_hash, access_code,
                    download_count, created_at, updated_at
             FROM files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Get a record by access code (case sensitive).
    pub async fn get_by_access_code(&self, code: &str) -> Result<Option<FileRecord>> {
        let record = sqlx::query_as::<_, FileRecord>(
            "SELECT id, stored_name, original_name, password_hash, access_code,
                    download_count, created_at, updated_at
             FROM files WHERE access_code = ?",
        )
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// Look up a record by a single identity.
    pub async fn lookup(&self, identity: &Identity) -> Result<Option<FileRecord>> {
        match identity {
            Identity::ById(id) => self.get_by_id(*id).await,
            Identity::ByAccessCode(code) => self.get_by_access_code(code).await,
        }
    }

    /// Resolve a raw identity string to a record.
    ///
    /// Tries each candidate in precedence order (id before access code)
    /// and returns the first match.
    pub async fn resolve(&self, raw: &str) -> Result<Option<FileRecord>> {
        for identity in Identity::candidates(raw) {
            if let Some(record) = self.lookup(&identity).await? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    /// Check whether an access code is already taken.
    pub async fn access_code_exists(&self, code: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM files WHERE access_code = ?)")
                .bind(code)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Atomically consume one download slot.
    ///
    /// The increment and the limit check are a single conditional UPDATE,
    /// so two concurrent callers racing for the last slot cannot both
    /// succeed. Returns the updated record, or `None` when the quota is
    /// already exhausted.
    pub async fn try_consume_slot(&self, id: i64) -> Result<Option<FileRecord>> {
        let result = sqlx::query(
            "UPDATE files
             SET download_count = download_count + 1, updated_at = datetime('now')
             WHERE id = ? AND download_count < ?",
        )
        .bind(id)
        .bind(MAX_DOWNLOADS)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }
}
