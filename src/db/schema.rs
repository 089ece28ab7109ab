//! Database schema and migrations for Dropslot.
//!
//! Migrations are applied sequentially the first time the database is
//! opened or when a new version ships.

/// Database migrations.
///
/// Each migration is a SQL script executed in order. The schema_version
/// table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - files table
    r#"
-- One row per uploaded file
CREATE TABLE files (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    stored_name     TEXT NOT NULL,            -- blob locator inside the storage directory
    original_name   TEXT NOT NULL,            -- filename suggested on download
    password_hash   TEXT,                     -- Argon2 hash; NULL = no password gate
    access_code     TEXT NOT NULL,            -- 8 chars, [A-Z0-9], case sensitive
    download_count  INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX idx_files_access_code ON files(access_code);
"#,
];
