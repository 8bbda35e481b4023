//! Tunable game parameters.
//!
//! A fixed set of keys with a static default table. Reads are read-through
//! with write-on-miss: the first `get` of an unset key persists its default,
//! and later reads return the stored row even if the default table changes in
//! a newer build. Values are stored as opaque text and coerced to `i64` on
//! read; a row that fails coercion is a [`EconomyError::CorruptValue`], never
//! a silent fallback to the default.

use std::fmt;

use sqlx::{Row, SqliteConnection};
use tracing::debug;

use super::error::{EcoResult, EconomyError};

/// How a key's raw text input is interpreted by the config panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Plain integer: an amount or a per-day limit
    Int,
    /// Duration entered via the codec, stored as whole seconds
    DurationSecs,
}

/// The fixed set of tunable parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    /// Amount credited by the daily bonus
    DailyAmount,
    /// Minimum wait between two daily claims by one user
    DailyCooldown,
    /// How many thefts one user may attempt per day
    StealMaxPerDay,
    /// Smallest amount a theft can take (and the poorest viable target)
    StealMinAmount,
    /// Largest amount a theft can take
    StealMaxAmount,
    /// Suggested wait between thefts, for command layers that gate them
    StealCooldown,
    /// How many exchanges one user may make per day
    ExchangeMaxPerDay,
    /// Largest amount a single exchange may move
    ExchangeMaxAmount,
    /// Suggested wait between exchanges (0 = none)
    ExchangeCooldown,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 9] = [
        ConfigKey::DailyAmount,
        ConfigKey::DailyCooldown,
        ConfigKey::StealMaxPerDay,
        ConfigKey::StealMinAmount,
        ConfigKey::StealMaxAmount,
        ConfigKey::StealCooldown,
        ConfigKey::ExchangeMaxPerDay,
        ConfigKey::ExchangeMaxAmount,
        ConfigKey::ExchangeCooldown,
    ];

    /// Wire name, used as the `config.key` column and in operator input.
    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::DailyAmount => "daily_amount",
            ConfigKey::DailyCooldown => "daily_cooldown",
            ConfigKey::StealMaxPerDay => "steal_max_per_day",
            ConfigKey::StealMinAmount => "steal_min_amount",
            ConfigKey::StealMaxAmount => "steal_max_amount",
            ConfigKey::StealCooldown => "steal_cooldown",
            ConfigKey::ExchangeMaxPerDay => "exchange_max_per_day",
            ConfigKey::ExchangeMaxAmount => "exchange_max_amount",
            ConfigKey::ExchangeCooldown => "exchange_cooldown",
        }
    }

    /// Look up a key by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }

    /// Static default, materialized into the store on first read.
    pub fn default_value(self) -> i64 {
        match self {
            ConfigKey::DailyAmount => 100,
            ConfigKey::DailyCooldown => 86_400,
            ConfigKey::StealMaxPerDay => 3,
            ConfigKey::StealMinAmount => 10,
            ConfigKey::StealMaxAmount => 120,
            ConfigKey::StealCooldown => 3600,
            ConfigKey::ExchangeMaxPerDay => 5,
            ConfigKey::ExchangeMaxAmount => 500,
            ConfigKey::ExchangeCooldown => 0,
        }
    }

    pub fn kind(self) -> ValueKind {
        match self {
            ConfigKey::DailyCooldown | ConfigKey::StealCooldown | ConfigKey::ExchangeCooldown => {
                ValueKind::DurationSecs
            }
            _ => ValueKind::Int,
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read a key, materializing its default on first access.
pub async fn get(conn: &mut SqliteConnection, key: ConfigKey) -> EcoResult<i64> {
    let row = sqlx::query("SELECT value FROM config WHERE key = ?1")
        .bind(key.as_str())
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => {
            let text: String = row.get(0);
            text.trim().parse::<i64>().map_err(|_| EconomyError::CorruptValue {
                key: key.as_str(),
                value: text,
            })
        }
        None => {
            let default = key.default_value();
            sqlx::query("INSERT INTO config (key, value) VALUES (?1, ?2)")
                .bind(key.as_str())
                .bind(default.to_string())
                .execute(&mut *conn)
                .await?;
            debug!(key = key.as_str(), value = default, "config default materialized");
            Ok(default)
        }
    }
}

/// Upsert a key. Range validation belongs to the caller.
pub async fn set(conn: &mut SqliteConnection, key: ConfigKey, value: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO config (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key.as_str())
    .bind(value.to_string())
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::store::EcoStore;

    #[test]
    fn test_key_names_roundtrip() {
        for key in ConfigKey::ALL {
            assert_eq!(ConfigKey::from_name(key.as_str()), Some(key));
        }
        assert_eq!(ConfigKey::from_name("vols_max_par_jours"), None);
        assert_eq!(ConfigKey::from_name(""), None);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(ConfigKey::DailyAmount.kind(), ValueKind::Int);
        assert_eq!(ConfigKey::DailyCooldown.kind(), ValueKind::DurationSecs);
        assert_eq!(ConfigKey::StealCooldown.kind(), ValueKind::DurationSecs);
        assert_eq!(ConfigKey::ExchangeMaxAmount.kind(), ValueKind::Int);
    }

    #[tokio::test]
    async fn test_get_materializes_default_once() {
        let store = EcoStore::open_in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        assert_eq!(get(&mut conn, ConfigKey::DailyAmount).await.unwrap(), 100);

        // The default is now a stored row, independent of the table
        let row = sqlx::query("SELECT value FROM config WHERE key = 'daily_amount'")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
        assert_eq!(row.get::<String, _>(0), "100");
    }

    #[tokio::test]
    async fn test_get_prefers_stored_value_over_default() {
        let store = EcoStore::open_in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        set(&mut conn, ConfigKey::DailyAmount, 250).await.unwrap();
        assert_eq!(get(&mut conn, ConfigKey::DailyAmount).await.unwrap(), 250);
    }

    #[tokio::test]
    async fn test_set_upserts() {
        let store = EcoStore::open_in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        set(&mut conn, ConfigKey::StealMaxPerDay, 5).await.unwrap();
        set(&mut conn, ConfigKey::StealMaxPerDay, 7).await.unwrap();
        assert_eq!(get(&mut conn, ConfigKey::StealMaxPerDay).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_a_distinct_error() {
        let store = EcoStore::open_in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        sqlx::query("INSERT INTO config (key, value) VALUES ('daily_amount', 'lots')")
            .execute(&mut *conn)
            .await
            .unwrap();

        let err = get(&mut conn, ConfigKey::DailyAmount).await.unwrap_err();
        assert!(matches!(err, EconomyError::CorruptValue { key: "daily_amount", .. }));
    }
}
