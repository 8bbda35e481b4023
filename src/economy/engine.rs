//! Economic operations.
//!
//! [`EconomyEngine`] composes the config store, quota tracker, cooldown gate,
//! and ledger. Each operation runs its whole read-check-mutate sequence
//! inside one SQLite transaction: a failed precondition returns before
//! anything is written, and a storage error rolls the transaction back, so
//! partial updates are never visible. Two concurrent operations against the
//! same user serialize at the database.
//!
//! Operations return plain receipt structs; formatting user-facing text is
//! the caller's job. Admin capability is also the caller's job: `grant`,
//! `remove`, `reset`, and `set_config` assume it was already checked.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tracing::info;

use super::config::{self, ConfigKey, ValueKind};
use super::cooldown::CooldownGate;
use super::duration;
use super::error::{EcoResult, EconomyError};
use super::ledger;
use super::quota::{self, Action};
use super::store::{EcoStore, UserId};

/// Outcome of a daily bonus claim
#[derive(Debug, Clone, Serialize)]
pub struct DailyReceipt {
    pub amount: i64,
    pub balance: i64,
}

/// Outcome of a successful theft
#[derive(Debug, Clone, Serialize)]
pub struct StealReceipt {
    pub amount: i64,
    pub actor_balance: i64,
    pub target_balance: i64,
}

/// Outcome of a fund transfer
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeReceipt {
    pub amount: i64,
    pub actor_balance: i64,
    pub target_balance: i64,
}

/// Outcome of an admin giveaway
#[derive(Debug, Clone, Serialize)]
pub struct GrantReceipt {
    pub amount: i64,
    pub admin_balance: i64,
    pub target_balance: i64,
}

/// Outcome of an admin removal
#[derive(Debug, Clone, Serialize)]
pub struct RemoveReceipt {
    pub amount: i64,
    pub balance: i64,
}

/// Outcome of an admin balance reset
#[derive(Debug, Clone, Serialize)]
pub struct ResetReceipt {
    pub previous_balance: i64,
}

/// One leaderboard row
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub user: UserId,
    pub balance: i64,
}

/// A config key with its current value and human-readable rendering
#[derive(Debug, Clone, Serialize)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: i64,
    pub display: String,
}

/// The economy engine
#[derive(Debug, Clone)]
pub struct EconomyEngine {
    store: EcoStore,
    gate: CooldownGate,
}

impl EconomyEngine {
    pub fn new(store: EcoStore) -> Self {
        Self {
            store,
            gate: CooldownGate::new(),
        }
    }

    pub fn store(&self) -> &EcoStore {
        &self.store
    }

    /// The cooldown gate, for command layers that want to gate steal or
    /// exchange with the `steal_cooldown`/`exchange_cooldown` keys.
    pub fn gate(&self) -> &CooldownGate {
        &self.gate
    }

    /// Read a user's balance, creating the account on first reference.
    pub async fn balance_of(&self, user: &UserId) -> EcoResult<i64> {
        let mut tx = self.store.begin().await?;
        let balance = ledger::balance(&mut tx, user).await?;
        tx.commit().await?;
        Ok(balance)
    }

    /// Claim the daily bonus.
    ///
    /// Gated by `daily_cooldown` per user; the gate is stamped only after
    /// the transaction commits.
    pub async fn daily(&self, user: &UserId) -> EcoResult<DailyReceipt> {
        let mut tx = self.store.begin().await?;

        let cooldown = config::get(&mut tx, ConfigKey::DailyCooldown).await?;
        self.gate
            .check(user, Action::Daily, Duration::from_secs(cooldown.max(0) as u64))
            .map_err(|remaining| EconomyError::OnCooldown { remaining })?;

        let amount = config::get(&mut tx, ConfigKey::DailyAmount).await?;
        let balance = ledger::apply_delta(&mut tx, user, amount).await?;
        quota::increment(&mut tx, user, Action::Daily, quota::today_utc()).await?;
        tx.commit().await?;

        self.gate.record(user, Action::Daily);
        info!(user = %user, amount, balance, "daily bonus claimed");
        Ok(DailyReceipt { amount, balance })
    }

    /// Steal a random amount from another user.
    ///
    /// The draw is uniform over `[steal_min_amount, min(steal_max_amount,
    /// target balance)]`, a range the target-too-poor check keeps non-empty.
    pub async fn steal(&self, actor: &UserId, target: &UserId) -> EcoResult<StealReceipt> {
        if actor == target {
            return Err(EconomyError::SelfTarget);
        }

        let mut tx = self.store.begin().await?;

        let limit = config::get(&mut tx, ConfigKey::StealMaxPerDay).await?;
        let today = quota::today_utc();
        if !quota::allowed(&mut tx, actor, Action::Steal, today, limit).await? {
            return Err(EconomyError::QuotaExceeded {
                action: Action::Steal,
                limit,
            });
        }

        let minimum = config::get(&mut tx, ConfigKey::StealMinAmount).await?;
        let maximum = config::get(&mut tx, ConfigKey::StealMaxAmount).await?;
        let target_balance = ledger::balance(&mut tx, target).await?;
        if target_balance < minimum {
            return Err(EconomyError::TargetTooPoor {
                balance: target_balance,
                minimum,
            });
        }

        let amount = draw_amount(minimum, maximum.min(target_balance));
        let actor_balance = ledger::apply_delta(&mut tx, actor, amount).await?;
        let target_balance = ledger::apply_delta(&mut tx, target, -amount).await?;
        quota::increment(&mut tx, actor, Action::Steal, today).await?;
        tx.commit().await?;

        info!(actor = %actor, target = %target, amount, "theft succeeded");
        Ok(StealReceipt {
            amount,
            actor_balance,
            target_balance,
        })
    }

    /// Transfer `amount` from `actor` to `target`.
    pub async fn exchange(
        &self,
        actor: &UserId,
        target: &UserId,
        amount: i64,
    ) -> EcoResult<ExchangeReceipt> {
        if amount <= 0 {
            return Err(EconomyError::InvalidAmount);
        }

        let mut tx = self.store.begin().await?;

        let limit = config::get(&mut tx, ConfigKey::ExchangeMaxPerDay).await?;
        let today = quota::today_utc();
        if !quota::allowed(&mut tx, actor, Action::Exchange, today, limit).await? {
            return Err(EconomyError::QuotaExceeded {
                action: Action::Exchange,
                limit,
            });
        }

        let max_amount = config::get(&mut tx, ConfigKey::ExchangeMaxAmount).await?;
        if amount > max_amount {
            return Err(EconomyError::AmountTooLarge {
                amount,
                max: max_amount,
            });
        }

        let actor_balance = ledger::balance(&mut tx, actor).await?;
        if actor_balance < amount {
            return Err(EconomyError::InsufficientFunds {
                balance: actor_balance,
                amount,
            });
        }

        let actor_balance = ledger::apply_delta(&mut tx, actor, -amount).await?;
        let target_balance = ledger::apply_delta(&mut tx, target, amount).await?;
        quota::increment(&mut tx, actor, Action::Exchange, today).await?;
        tx.commit().await?;

        info!(actor = %actor, target = %target, amount, "exchange completed");
        Ok(ExchangeReceipt {
            amount,
            actor_balance,
            target_balance,
        })
    }

    /// Give `amount` to `target` out of the admin's own balance.
    ///
    /// The amount is not validated against the admin's balance; a generous
    /// admin floors at zero while the target is credited in full.
    pub async fn grant(
        &self,
        admin: &UserId,
        target: &UserId,
        amount: i64,
    ) -> EcoResult<GrantReceipt> {
        let mut tx = self.store.begin().await?;

        let admin_balance = ledger::apply_delta(&mut tx, admin, -amount).await?;
        let target_balance = ledger::apply_delta(&mut tx, target, amount).await?;
        quota::increment(&mut tx, admin, Action::Grant, quota::today_utc()).await?;
        tx.commit().await?;

        info!(admin = %admin, target = %target, amount, "grant issued");
        Ok(GrantReceipt {
            amount,
            admin_balance,
            target_balance,
        })
    }

    /// Take `amount` away from `target`.
    ///
    /// Unlike the flows that floor silently, this reports insufficient funds
    /// when the target holds less than `amount`.
    pub async fn remove(&self, target: &UserId, amount: i64) -> EcoResult<RemoveReceipt> {
        let mut tx = self.store.begin().await?;

        let balance = ledger::balance(&mut tx, target).await?;
        if amount > balance {
            return Err(EconomyError::InsufficientFunds { balance, amount });
        }

        let balance = ledger::apply_delta(&mut tx, target, -amount).await?;
        tx.commit().await?;

        info!(target = %target, amount, balance, "funds removed");
        Ok(RemoveReceipt { amount, balance })
    }

    /// Reset `target`'s balance to zero.
    pub async fn reset(&self, target: &UserId) -> EcoResult<ResetReceipt> {
        let mut tx = self.store.begin().await?;

        let previous_balance = ledger::balance(&mut tx, target).await?;
        ledger::apply_delta(&mut tx, target, -previous_balance).await?;
        tx.commit().await?;

        info!(target = %target, previous_balance, "balance reset");
        Ok(ResetReceipt { previous_balance })
    }

    /// Top balances, richest first.
    pub async fn leaderboard(&self, limit: i64) -> EcoResult<Vec<LeaderboardEntry>> {
        let mut conn = self.store.pool().acquire().await?;
        let rows = ledger::top(&mut conn, limit).await?;
        Ok(rows
            .into_iter()
            .map(|(user, balance)| LeaderboardEntry { user, balance })
            .collect())
    }

    /// Set a config key from raw operator text.
    ///
    /// Duration-typed keys go through the codec (a result of 0 is rejected
    /// as unparseable); everything else must be an integer.
    pub async fn set_config(&self, key_name: &str, raw: &str) -> EcoResult<ConfigEntry> {
        let key = ConfigKey::from_name(key_name)
            .ok_or_else(|| EconomyError::UnknownKey(key_name.to_string()))?;

        let value = match key.kind() {
            ValueKind::DurationSecs => {
                let secs = duration::parse(raw);
                if secs == 0 {
                    return Err(EconomyError::InvalidDuration(raw.to_string()));
                }
                i64::try_from(secs).unwrap_or(i64::MAX)
            }
            ValueKind::Int => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| EconomyError::InvalidNumber(raw.to_string()))?,
        };

        let mut tx = self.store.begin().await?;
        config::set(&mut tx, key, value).await?;
        tx.commit().await?;

        info!(key = key.as_str(), value, "config updated");
        Ok(render_entry(key, value))
    }

    /// Read one config key (materializing its default on first access).
    pub async fn get_config(&self, key_name: &str) -> EcoResult<ConfigEntry> {
        let key = ConfigKey::from_name(key_name)
            .ok_or_else(|| EconomyError::UnknownKey(key_name.to_string()))?;

        let mut tx = self.store.begin().await?;
        let value = config::get(&mut tx, key).await?;
        tx.commit().await?;
        Ok(render_entry(key, value))
    }

    /// Every config key with its current value.
    pub async fn config_snapshot(&self) -> EcoResult<Vec<ConfigEntry>> {
        let mut tx = self.store.begin().await?;
        let mut entries = Vec::with_capacity(ConfigKey::ALL.len());
        for key in ConfigKey::ALL {
            let value = config::get(&mut tx, key).await?;
            entries.push(render_entry(key, value));
        }
        tx.commit().await?;
        Ok(entries)
    }
}

fn render_entry(key: ConfigKey, value: i64) -> ConfigEntry {
    let display = match key.kind() {
        ValueKind::DurationSecs => duration::format(value.max(0) as u64),
        ValueKind::Int => value.to_string(),
    };
    ConfigEntry {
        key: key.as_str(),
        value,
        display,
    }
}

/// Uniform inclusive draw for the theft amount.
///
/// Degenerate config (max below min) collapses to the minimum instead of
/// panicking in `gen_range`.
fn draw_amount(min: i64, max: i64) -> i64 {
    if min >= max {
        return min;
    }
    rand::thread_rng().gen_range(min..=max)
}
