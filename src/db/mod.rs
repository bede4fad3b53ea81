//! Database module for Treehole.
//!
//! SQLite storage through sqlx. A [`Database`] owns one write primary pool and
//! any number of read-only replica pools; every storage call states which one
//! it needs through [`Access`].

mod schema;

pub use schema::MIGRATIONS;

use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::{Result, TreeholeError};

/// Connection pool type.
pub type DbPool = SqlitePool;

/// Transaction on the write primary.
pub type DbTransaction = Transaction<'static, Sqlite>;

/// Current timestamp with millisecond precision, as stored in the schema.
pub const SQL_NOW: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

/// Connection capability requested by a storage call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Listing reads. May be served by a replica that lags the primary.
    Read,
    /// Reads that must observe the caller's own preceding write.
    ReadAfterWrite,
    /// Mutations.
    Write,
}

/// Database wrapper holding the primary and replica pools.
pub struct Database {
    primary: DbPool,
    replicas: Vec<DbPool>,
    next_replica: AtomicUsize,
}

impl Database {
    /// Open the primary and replica databases described by `config`.
    ///
    /// The primary file is created if missing and migrations are applied to it.
    pub async fn open(config: &DatabaseConfig) -> Result<Self> {
        let path = Path::new(&config.path);
        info!("Opening database at {:?}", path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let busy_timeout = Duration::from_millis(config.busy_timeout_ms);
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(busy_timeout);

        let primary = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| TreeholeError::DatabaseConnection(e.to_string()))?;

        let db = Self {
            primary,
            replicas: Vec::new(),
            next_replica: AtomicUsize::new(0),
        };
        db.migrate().await?;

        let mut replicas = Vec::with_capacity(config.replica_paths.len());
        for replica_path in &config.replica_paths {
            debug!("Opening read replica at {:?}", replica_path);
            let options = SqliteConnectOptions::new()
                .filename(replica_path)
                .read_only(true)
                .busy_timeout(busy_timeout);
            let pool = SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(options)
                .await
                .map_err(|e| TreeholeError::DatabaseConnection(e.to_string()))?;
            replicas.push(pool);
        }

        Ok(Self { replicas, ..db })
    }

    /// Open an in-memory database for testing.
    ///
    /// The pool is pinned to a single connection that never expires, because
    /// every SQLite in-memory connection is its own database.
    pub async fn open_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let primary = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| TreeholeError::DatabaseConnection(e.to_string()))?;

        let db = Self {
            primary,
            replicas: Vec::new(),
            next_replica: AtomicUsize::new(0),
        };
        db.migrate().await?;
        Ok(db)
    }

    /// Select the pool for the requested access.
    ///
    /// `Read` rotates over the replicas, falling back to the primary when none
    /// are configured. `ReadAfterWrite` and `Write` always use the primary.
    pub fn pool(&self, access: Access) -> &DbPool {
        match access {
            Access::Read if !self.replicas.is_empty() => {
                let index =
                    self.next_replica.fetch_add(1, Ordering::Relaxed) % self.replicas.len();
                &self.replicas[index]
            }
            _ => &self.primary,
        }
    }

    /// Number of configured read replicas.
    pub fn replica_count(&self) -> usize {
        self.replicas.len()
    }

    /// Begin a new transaction on the write primary.
    pub async fn begin(&self) -> Result<DbTransaction> {
        Ok(self.pool(Access::Write).begin().await?)
    }

    /// Get the current schema version.
    pub async fn schema_version(&self) -> Result<i64> {
        let pool = self.pool(Access::Write);
        let table_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_version')",
        )
        .fetch_one(pool)
        .await?;

        if !table_exists {
            return Ok(0);
        }

        let version: i64 =
            sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_version")
                .fetch_one(pool)
                .await?;
        Ok(version)
    }

    /// Apply pending migrations to the primary.
    pub async fn migrate(&self) -> Result<()> {
        let current_version = self.schema_version().await?;

        if current_version as usize >= MIGRATIONS.len() {
            debug!("Database is up to date (version {})", current_version);
            return Ok(());
        }

        info!(
            "Migrating database from version {} to {}",
            current_version,
            MIGRATIONS.len()
        );

        let pool = self.pool(Access::Write);
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_version (
                version     INTEGER PRIMARY KEY,
                applied_at  TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .execute(pool)
        .await?;

        for (i, migration) in MIGRATIONS.iter().enumerate().skip(current_version as usize) {
            let version = (i + 1) as i64;
            info!("Applying migration v{}", version);

            let mut tx = pool.begin().await?;
            sqlx::raw_sql(migration).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
                .bind(version)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;

            debug!("Migration v{} applied successfully", version);
        }

        info!(
            "Database migration complete (now at version {})",
            MIGRATIONS.len()
        );
        Ok(())
    }

    /// Check if a table exists on the primary.
    pub async fn table_exists(&self, table_name: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = $1)",
        )
        .bind(table_name)
        .fetch_one(self.pool(Access::Write))
        .await?;
        Ok(exists)
    }

    /// Close every pool.
    pub async fn close(&self) {
        for replica in &self.replicas {
            replica.close().await;
        }
        self.primary.close().await;
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("replicas", &self.replicas.len())
            .finish()
    }
}
