//! Coinbot - Chat Economy Game Engine
//!
//! Persistent per-user balances with daily bonuses, theft, exchanges, and an
//! operator-tunable configuration store, backed by a single SQLite database.
//!
//! Key principles:
//! - The engine returns structured receipts; rendering belongs to the caller
//! - Every operation runs as one SQLite transaction (no lost updates per user)
//! - Balances never go negative (deltas floor at zero)
//! - Daily quotas reset by calendar day, not by rolling window

pub mod economy;
