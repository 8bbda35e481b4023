//! Economy store
//!
//! One SQLite database (`economy.db`) holding the three economy tables:
//! user balances, config key/value pairs, and daily quota counters. The
//! schema is created idempotently at open, so a fresh file is usable
//! immediately. No state is cached in-process; every operation re-reads
//! current rows inside its own transaction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Opaque stable per-user identifier.
///
/// Stored as TEXT so both numeric snowflakes and UUID-style identifiers fit
/// without truncation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

const CREATE_USERS: &str = "CREATE TABLE IF NOT EXISTS users (
    id      TEXT PRIMARY KEY,
    balance INTEGER NOT NULL
)";

const CREATE_CONFIG: &str = "CREATE TABLE IF NOT EXISTS config (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

const CREATE_QUOTAS: &str = "CREATE TABLE IF NOT EXISTS quotas (
    user_id TEXT NOT NULL,
    action  TEXT NOT NULL,
    day     INTEGER NOT NULL,
    count   INTEGER NOT NULL,
    PRIMARY KEY (user_id, action, day)
)";

/// Handle to the economy database
#[derive(Debug, Clone)]
pub struct EcoStore {
    pool: SqlitePool,
}

impl EcoStore {
    /// Open (or create) the economy database at `path`.
    ///
    /// WAL journaling plus a busy timeout keeps concurrent command handlers
    /// from failing fast on a locked database.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// In-memory store for tests.
    ///
    /// Pinned to a single pooled connection: every SQLite `:memory:`
    /// connection is otherwise its own private database.
    pub async fn open_in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new().in_memory(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_USERS).execute(&self.pool).await?;
        sqlx::query(CREATE_CONFIG).execute(&self.pool).await?;
        sqlx::query(CREATE_QUOTAS).execute(&self.pool).await?;
        Ok(())
    }

    /// Begin a transaction spanning one logical operation.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
