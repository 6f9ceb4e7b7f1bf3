//! Shared primitive type aliases used across all crates.

/// Database row identifier (`BIGSERIAL` / `BIGINT`).
pub type DbId = i64;

/// Timestamp with time zone, as stored in `TIMESTAMPTZ` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
