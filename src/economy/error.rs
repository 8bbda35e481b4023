//! Error taxonomy for the economy engine.
//!
//! Validation and quota errors reject the operation before any mutation and
//! are recoverable by the user; storage errors abort the operation with its
//! transaction rolled back, so no partial state is ever visible. Nothing is
//! retried automatically; every failure returns synchronously as the
//! operation's result.

use std::time::Duration;

use super::duration;
use super::quota::Action;

/// Result type for engine operations
pub type EcoResult<T> = Result<T, EconomyError>;

/// Economy engine errors
#[derive(Debug, thiserror::Error)]
pub enum EconomyError {
    #[error("you cannot target yourself")]
    SelfTarget,

    #[error("daily {action} limit reached ({limit} per day)")]
    QuotaExceeded { action: Action, limit: i64 },

    #[error("on cooldown, retry in {}", duration::format(.remaining.as_secs()))]
    OnCooldown { remaining: Duration },

    #[error("target balance {balance} is below the stealable minimum of {minimum}")]
    TargetTooPoor { balance: i64, minimum: i64 },

    #[error("amount must be positive")]
    InvalidAmount,

    #[error("amount {amount} exceeds the per-exchange cap of {max}")]
    AmountTooLarge { amount: i64, max: i64 },

    #[error("insufficient funds: balance is {balance}, needed {amount}")]
    InsufficientFunds { balance: i64, amount: i64 },

    #[error("invalid duration {0:?} (examples: 30m, 2h, 1j, 1h30m)")]
    InvalidDuration(String),

    #[error("invalid number {0:?}")]
    InvalidNumber(String),

    #[error("unknown config key {0:?}")]
    UnknownKey(String),

    #[error("stored value {value:?} for config key {key} is not an integer")]
    CorruptValue { key: &'static str, value: String },

    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
}
