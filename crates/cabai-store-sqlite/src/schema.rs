//! SQL schema for the classification store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are insert-only; no UPDATE or DELETE is ever issued.
CREATE TABLE IF NOT EXISTS klasifikasi (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    path        TEXT    NOT NULL,             -- blob key
    hasil       INTEGER NOT NULL CHECK (hasil IN (0, 1)),  -- 1 = sehat, 0 = sakit
    created_at  TEXT    NOT NULL,             -- RFC 3339 UTC
    updated_at  TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS klasifikasi_hasil_idx ON klasifikasi(hasil);

PRAGMA user_version = 1;
";
