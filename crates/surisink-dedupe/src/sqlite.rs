//! Persistent dedup store: the `seen` table in an embedded SQLite file.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::traits::{DedupBackend, DedupStore, StoreError, StoreResult};

const MAX_CONNECTIONS: u32 = 4;
const BUSY_TIMEOUT_SECS: u64 = 5;

const CREATE_SEEN_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS seen (
  sha256 TEXT PRIMARY KEY,
  s3_key TEXT,
  size INTEGER,
  mime TEXT,
  first_seen TEXT,
  last_seen TEXT,
  count INTEGER DEFAULT 1
)
"#;

/// Row type for the `seen` table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct SeenRow {
    sha256: String,
    s3_key: String,
    size: i64,
    mime: String,
    first_seen: String,
    last_seen: String,
    count: i64,
}

impl SeenRow {
    fn to_dedup_record(self) -> StoreResult<DedupRecord> {
        Ok(DedupRecord {
            content_hash: self.sha256,
            object_key: self.s3_key,
            size_bytes: u64::try_from(self.size).unwrap_or(0),
            mime_type: self.mime,
            first_seen: parse_db_timestamp(&self.first_seen)?,
            last_seen: parse_db_timestamp(&self.last_seen)?,
            occurrence_count: u64::try_from(self.count).unwrap_or(0),
        })
    }
}

/// A content hash that has been uploaded at least once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupRecord {
    pub content_hash: String,
    pub object_key: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub occurrence_count: u64,
}

/// SQLite-backed dedup store.
///
/// Upsert atomicity relies on SQLite's own write serialization; the file is
/// opened in WAL mode so readers do not block the writer.
#[derive(Clone)]
pub struct SqliteDedupStore {
    pool: SqlitePool,
}

impl SqliteDedupStore {
    /// Open (creating if needed) the database at `path` and ensure the schema.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS));

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_SEEN_TABLE).execute(&pool).await?;

        tracing::info!(path = %path.display(), "Dedupe SQLite store opened");

        Ok(Self { pool })
    }

    /// Insert-or-increment in one statement, stamped with `now`.
    ///
    /// A fresh row starts at `count = 1` with `first_seen = last_seen = now`.
    /// An existing row keeps its `first_seen`, object key and size; `count` is
    /// incremented and `last_seen` moves forward (never backwards).
    #[tracing::instrument(skip(self), fields(db.table = "seen"))]
    pub async fn mark_at(
        &self,
        content_hash: &str,
        object_key: &str,
        size_bytes: u64,
        mime_type: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<()> {
        let now = to_db_timestamp(now);
        sqlx::query(
            r#"
            INSERT INTO seen (sha256, s3_key, size, mime, first_seen, last_seen, count)
            VALUES (?, ?, ?, ?, ?, ?, 1)
            ON CONFLICT(sha256) DO UPDATE SET
              last_seen = MAX(seen.last_seen, excluded.last_seen),
              count = seen.count + 1
            "#,
        )
        .bind(content_hash)
        .bind(object_key)
        .bind(i64::try_from(size_bytes).unwrap_or(i64::MAX))
        .bind(mime_type)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch the row for a content hash.
    pub async fn get(&self, content_hash: &str) -> StoreResult<Option<DedupRecord>> {
        let row: Option<SeenRow> = sqlx::query_as::<_, SeenRow>(
            "SELECT sha256, s3_key, size, mime, first_seen, last_seen, count FROM seen WHERE sha256 = ?",
        )
        .bind(content_hash)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SeenRow::to_dedup_record).transpose()
    }

    pub async fn count(&self) -> StoreResult<u64> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM seen")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    /// Delete rows whose `last_seen` is older than `retention_days`.
    ///
    /// Returns the number of rows removed. A retention of 0 disables GC; a
    /// retention reaching before the earliest representable date is an error.
    pub async fn purge_older_than(&self, retention_days: u32) -> StoreResult<u64> {
        self.purge_older_than_at(retention_days, Utc::now()).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "seen"))]
    pub async fn purge_older_than_at(
        &self,
        retention_days: u32,
        now: DateTime<Utc>,
    ) -> StoreResult<u64> {
        if retention_days == 0 {
            return Ok(0);
        }

        let cutoff = now
            .checked_sub_days(Days::new(u64::from(retention_days)))
            .ok_or(StoreError::RetentionOutOfRange(retention_days))?;
        let result = sqlx::query("DELETE FROM seen WHERE last_seen < ?")
            .bind(to_db_timestamp(cutoff))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DedupStore for SqliteDedupStore {
    async fn check(&self, content_hash: &str) -> StoreResult<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM seen WHERE sha256 = ?")
            .bind(content_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn mark(
        &self,
        content_hash: &str,
        object_key: &str,
        size_bytes: u64,
        mime_type: &str,
    ) -> StoreResult<()> {
        self.mark_at(content_hash, object_key, size_bytes, mime_type, Utc::now())
            .await
    }

    fn backend_type(&self) -> DedupBackend {
        DedupBackend::Sqlite
    }
}

/// Fixed-width UTC timestamps so that text comparison orders them correctly.
fn to_db_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

fn parse_db_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| StoreError::InvalidTimestamp {
            value: value.to_string(),
            source,
        })
}
