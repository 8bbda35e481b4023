//! Per-user, per-action, per-day usage counters.
//!
//! A quota row is keyed `(user_id, action, day)` and created on the first
//! action of the day. There is no reset job: a new calendar day simply has no
//! row yet, which reads as zero uses. Counts are never decremented and rows
//! are never pruned.
//!
//! The day boundary is the caller's clock in UTC. Days are stored as
//! days-since-Unix-epoch, which coincide exactly with UTC calendar days.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use sqlx::{Row, SqliteConnection};

use super::store::UserId;

/// Quota-tracked action types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Daily bonus claim
    Daily,
    /// Theft attempt
    Steal,
    /// Fund transfer to another user
    Exchange,
    /// Admin giveaway
    Grant,
}

impl Action {
    /// Stable name, used as the `quotas.action` column.
    pub fn name(self) -> &'static str {
        match self {
            Action::Daily => "daily",
            Action::Steal => "steal",
            Action::Exchange => "exchange",
            Action::Grant => "grant",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current UTC calendar day as days since the Unix epoch.
pub fn today_utc() -> i64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    (secs / 86_400) as i64
}

/// How many times `user` performed `action` on `day`.
pub async fn used(
    conn: &mut SqliteConnection,
    user: &UserId,
    action: Action,
    day: i64,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT count FROM quotas WHERE user_id = ?1 AND action = ?2 AND day = ?3")
        .bind(user.as_str())
        .bind(action.name())
        .bind(day)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(row.map(|r| r.get(0)).unwrap_or(0))
}

/// True while the day's count is strictly below `limit`.
pub async fn allowed(
    conn: &mut SqliteConnection,
    user: &UserId,
    action: Action,
    day: i64,
    limit: i64,
) -> Result<bool, sqlx::Error> {
    Ok(used(&mut *conn, user, action, day).await? < limit)
}

/// Record one more use, creating the day's row at 1.
pub async fn increment(
    conn: &mut SqliteConnection,
    user: &UserId,
    action: Action,
    day: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO quotas (user_id, action, day, count) VALUES (?1, ?2, ?3, 1)
         ON CONFLICT(user_id, action, day) DO UPDATE SET count = count + 1",
    )
    .bind(user.as_str())
    .bind(action.name())
    .bind(day)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
