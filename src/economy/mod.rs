//! Ledger & quota engine for the chat economy game.
//!
//! Components, leaves first:
//! - [`store`]: the SQLite database (users, config, quotas)
//! - [`config`]: typed key-value parameters with static defaults
//! - [`duration`]: human-readable time-span codec for cooldown values
//! - [`ledger`]: per-user balances, floored at zero
//! - [`quota`]: per-user/per-action/per-day usage counters
//! - [`cooldown`]: in-memory minimum-elapsed-time gate
//! - [`engine`]: the economic operations composing all of the above
//!
//! The chat-command layer (or the operator CLI) invokes an engine operation
//! with user identities and optional amounts; the operation reads config,
//! checks quota, mutates the ledger, and returns a receipt for rendering.

pub mod config;
pub mod cooldown;
pub mod duration;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod quota;
pub mod store;

pub use config::{ConfigKey, ValueKind};
pub use cooldown::CooldownGate;
pub use engine::{
    ConfigEntry, DailyReceipt, EconomyEngine, ExchangeReceipt, GrantReceipt, LeaderboardEntry,
    RemoveReceipt, ResetReceipt, StealReceipt,
};
pub use error::{EcoResult, EconomyError};
pub use quota::Action;
pub use store::{EcoStore, UserId};
