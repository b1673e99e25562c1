use {
    crate::{config::PERSISTENCE, domain::Category, models::Dataset},
    anyhow::{Context, Result},
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
    sqlx::{
        Row,
        sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions,
            SqliteSynchronous,
        },
    },
    std::{str::FromStr, time::Duration},
    uuid::Uuid,
};

/// Durable key-value persistence: exactly one snapshot per category,
/// last-write-wins, no history. Failures here are non-fatal to ingestion;
/// the hub logs and keeps the in-memory state.
#[async_trait]
pub trait SnapshotStorage: Send + Sync {
    async fn initialize(&self) -> Result<()>;
    /// Atomically replace the stored snapshot for a category.
    async fn put(&self, category: Category, dataset: &Dataset) -> Result<()>;
    /// Rehydrate a category; `None` means never ingested (or wiped).
    async fn get(&self, category: Category) -> Result<Option<Dataset>>;
    /// Wipe every category: state identical to a first-ever run.
    async fn clear(&self) -> Result<()>;
    /// Stable per-installation id, generated on first run.
    async fn installation_id(&self) -> Result<String>;
}

/// Binary snapshot wrapper with format metadata
#[derive(Serialize, Deserialize, Debug)]
struct SnapshotEnvelope {
    version: f64,
    saved_ms: i64,
    dataset: Dataset,
}

pub struct SqliteSnapshotStorage {
    pool: SqlitePool,
}

impl SqliteSnapshotStorage {
    pub async fn new(db_path: &str) -> Result<Self> {
        let connection_options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10))
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(2) // Low connection count, this is low throughput
            .connect_with(connection_options)
            .await
            .context("Failed to connect to snapshot db")?;

        let storage = Self { pool };
        storage.initialize().await?;

        Ok(storage)
    }

    /// Private in-memory database, mostly for tests. One connection only:
    /// every pooled connection would otherwise get its own empty database.
    pub async fn in_memory() -> Result<Self> {
        let connection_options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(connection_options)
            .await
            .context("Failed to open in-memory snapshot db")?;

        let storage = Self { pool };
        storage.initialize().await?;

        Ok(storage)
    }
}

#[async_trait]
impl SnapshotStorage for SqliteSnapshotStorage {
    async fn initialize(&self) -> Result<()> {
        // 1. Snapshot table (one row per category)
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS snapshots (
                category TEXT PRIMARY KEY,
                payload BLOB NOT NULL,
                saved_ms INTEGER NOT NULL
            );",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create snapshots table")?;

        // 2. Meta table (key-value)
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create meta table")?;

        // 3. Ensure identity exists
        let _ = self.installation_id().await?;

        Ok(())
    }

    async fn put(&self, category: Category, dataset: &Dataset) -> Result<()> {
        let envelope = SnapshotEnvelope {
            version: PERSISTENCE.version,
            saved_ms: chrono::Utc::now().timestamp_millis(),
            dataset: dataset.clone(),
        };
        let payload = bincode::serialize(&envelope).context("Failed to serialize snapshot")?;

        // Single statement, so the replace is atomic: readers see either
        // the old payload or the new one, never a partial write.
        sqlx::query("INSERT OR REPLACE INTO snapshots (category, payload, saved_ms) VALUES (?, ?, ?)")
            .bind(category.key())
            .bind(payload)
            .bind(envelope.saved_ms)
            .execute(&self.pool)
            .await
            .context("Failed to write snapshot")?;

        Ok(())
    }

    async fn get(&self, category: Category) -> Result<Option<Dataset>> {
        let row = sqlx::query("SELECT payload FROM snapshots WHERE category = ?")
            .bind(category.key())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to read snapshot")?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payload: Vec<u8> = row.try_get("payload")?;
        let envelope: SnapshotEnvelope =
            bincode::deserialize(&payload).context("Failed to deserialize snapshot")?;

        if envelope.version != PERSISTENCE.version {
            log::warn!(
                "discarding {} snapshot: format v{} on disk, v{} required",
                category,
                envelope.version,
                PERSISTENCE.version
            );
            return Ok(None);
        }

        Ok(Some(envelope.dataset))
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM snapshots")
            .execute(&self.pool)
            .await
            .context("Failed to clear snapshots")?;
        Ok(())
    }

    async fn installation_id(&self) -> Result<String> {
        let row = sqlx::query("SELECT value FROM meta WHERE key = 'installation_id'")
            .fetch_optional(&self.pool)
            .await?;

        if let Some(r) = row {
            Ok(r.get("value"))
        } else {
            let new_id = Uuid::new_v4().to_string();
            sqlx::query("INSERT INTO meta (key, value) VALUES ('installation_id', ?)")
                .bind(&new_id)
                .execute(&self.pool)
                .await?;
            Ok(new_id)
        }
    }
}
