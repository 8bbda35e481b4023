//! Per-user balance ledger.
//!
//! Accounts materialize lazily: the first read of an unknown user creates a
//! row at [`STARTING_BALANCE`]. The only mutation path is [`apply_delta`],
//! which floors at zero: a large negative delta clamps rather than erroring,
//! so a balance can never go negative. Operations that want an explicit
//! insufficient-funds failure check the balance before applying the delta.
//!
//! Functions take a `&mut SqliteConnection` so the caller decides the
//! transaction scope; the engine wraps each logical operation in one.

use sqlx::{Row, SqliteConnection};

use super::store::UserId;

/// Balance granted to every account on first reference.
pub const STARTING_BALANCE: i64 = 100;

/// Read a user's balance, creating the account if it does not exist.
pub async fn balance(conn: &mut SqliteConnection, user: &UserId) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT balance FROM users WHERE id = ?1")
        .bind(user.as_str())
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => Ok(row.get(0)),
        None => {
            sqlx::query("INSERT INTO users (id, balance) VALUES (?1, ?2)")
                .bind(user.as_str())
                .bind(STARTING_BALANCE)
                .execute(&mut *conn)
                .await?;
            Ok(STARTING_BALANCE)
        }
    }
}

/// Apply a signed delta to a user's balance, flooring at zero.
///
/// Returns the new balance. Read-then-write: callers run it inside a
/// transaction so concurrent deltas against the same user serialize.
pub async fn apply_delta(
    conn: &mut SqliteConnection,
    user: &UserId,
    delta: i64,
) -> Result<i64, sqlx::Error> {
    let current = balance(&mut *conn, user).await?;
    let updated = current.saturating_add(delta).max(0);

    sqlx::query("UPDATE users SET balance = ?1 WHERE id = ?2")
        .bind(updated)
        .bind(user.as_str())
        .execute(&mut *conn)
        .await?;

    Ok(updated)
}

/// Richest users first. Ties break on id for a stable ordering.
pub async fn top(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<(UserId, i64)>, sqlx::Error> {
    let rows = sqlx::query("SELECT id, balance FROM users ORDER BY balance DESC, id ASC LIMIT ?1")
        .bind(limit)
        .fetch_all(&mut *conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (UserId(row.get(0)), row.get(1)))
        .collect())
}
