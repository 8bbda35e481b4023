//! Per-user action cooldowns.
//!
//! A minimum elapsed-time gate between successive uses of one action by one
//! user, distinct from the quota tracker, which counts uses per calendar
//! day. The configured wait comes from the config store (`daily_cooldown`
//! and friends); this module only keeps the last-use timestamps.
//!
//! State is in-memory and thread-safe. A restart forgives an in-flight
//! cooldown; the persistent daily quota still bounds abuse.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

use super::quota::Action;
use super::store::UserId;

/// Cooldown gate for economy actions.
///
/// Tracks the last successful use per `(user, action)` and reports the
/// remaining wait while the gate is closed.
#[derive(Debug, Clone, Default)]
pub struct CooldownGate {
    last_use: Arc<RwLock<HashMap<(UserId, Action), SystemTime>>>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a user may perform an action right now.
    ///
    /// Returns `Ok(())` when the gate is open, or `Err(remaining)` with the
    /// wait left. A zero cooldown never blocks.
    pub fn check(&self, user: &UserId, action: Action, cooldown: Duration) -> Result<(), Duration> {
        if cooldown.is_zero() {
            return Ok(());
        }

        let last_use = self.last_use.read().unwrap();
        if let Some(&at) = last_use.get(&(user.clone(), action)) {
            let elapsed = SystemTime::now()
                .duration_since(at)
                .unwrap_or(Duration::ZERO);
            if elapsed < cooldown {
                return Err(cooldown - elapsed);
            }
        }

        Ok(())
    }

    /// Stamp a successful use. Call after the action commits.
    pub fn record(&self, user: &UserId, action: Action) {
        let mut last_use = self.last_use.write().unwrap();
        last_use.insert((user.clone(), action), SystemTime::now());
    }

    /// Remaining wait, or `None` when the gate is open.
    pub fn remaining(&self, user: &UserId, action: Action, cooldown: Duration) -> Option<Duration> {
        self.check(user, action, cooldown).err()
    }

    /// Forget a user's last use of an action.
    pub fn reset(&self, user: &UserId, action: Action) {
        let mut last_use = self.last_use.write().unwrap();
        last_use.remove(&(user.clone(), action));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: Duration = Duration::from_secs(86_400);

    fn user(name: &str) -> UserId {
        UserId::from(name)
    }

    #[test]
    fn test_first_use_is_immediate() {
        let gate = CooldownGate::new();
        assert!(gate.check(&user("alice"), Action::Daily, DAY).is_ok());
    }

    #[test]
    fn test_second_use_blocked_with_remaining_wait() {
        let gate = CooldownGate::new();
        let alice = user("alice");

        gate.record(&alice, Action::Daily);

        let remaining = gate.check(&alice, Action::Daily, DAY).unwrap_err();
        assert!(remaining.as_secs() >= 86_399 && remaining.as_secs() <= 86_400);
    }

    #[test]
    fn test_zero_cooldown_never_blocks() {
        let gate = CooldownGate::new();
        let alice = user("alice");

        gate.record(&alice, Action::Exchange);
        assert!(gate.check(&alice, Action::Exchange, Duration::ZERO).is_ok());
    }

    #[test]
    fn test_per_user_isolation() {
        let gate = CooldownGate::new();

        gate.record(&user("alice"), Action::Daily);

        assert!(gate.check(&user("alice"), Action::Daily, DAY).is_err());
        assert!(gate.check(&user("bob"), Action::Daily, DAY).is_ok());
    }

    #[test]
    fn test_per_action_isolation() {
        let gate = CooldownGate::new();
        let alice = user("alice");

        gate.record(&alice, Action::Daily);

        assert!(gate.check(&alice, Action::Daily, DAY).is_err());
        assert!(gate.check(&alice, Action::Steal, DAY).is_ok());
    }

    #[test]
    fn test_gate_reopens_after_cooldown_elapses() {
        let gate = CooldownGate::new();
        let alice = user("alice");

        // backdate the last use past the cooldown
        {
            let mut last_use = gate.last_use.write().unwrap();
            last_use.insert(
                (alice.clone(), Action::Daily),
                SystemTime::now() - Duration::from_secs(86_401),
            );
        }

        assert!(gate.check(&alice, Action::Daily, DAY).is_ok());
        assert!(gate.remaining(&alice, Action::Daily, DAY).is_none());
    }

    #[test]
    fn test_reset_reopens_the_gate() {
        let gate = CooldownGate::new();
        let alice = user("alice");

        gate.record(&alice, Action::Daily);
        assert!(gate.check(&alice, Action::Daily, DAY).is_err());

        gate.reset(&alice, Action::Daily);
        assert!(gate.check(&alice, Action::Daily, DAY).is_ok());
    }

    #[test]
    fn test_shorter_cooldown_reopens_sooner() {
        let gate = CooldownGate::new();
        let alice = user("alice");

        {
            let mut last_use = gate.last_use.write().unwrap();
            last_use.insert(
                (alice.clone(), Action::Steal),
                SystemTime::now() - Duration::from_secs(120),
            );
        }

        // 2 minutes elapsed: a 1-minute cooldown is open, a 1-hour one is not
        assert!(gate.check(&alice, Action::Steal, Duration::from_secs(60)).is_ok());
        assert!(gate.check(&alice, Action::Steal, Duration::from_secs(3600)).is_err());
    }

    #[test]
    fn test_concurrent_checks() {
        use std::thread;

        let gate = CooldownGate::new();
        let alice = user("alice");
        gate.record(&alice, Action::Daily);

        let mut handles = vec![];
        for _ in 0..10 {
            let gate = gate.clone();
            let alice = alice.clone();
            handles.push(thread::spawn(move || {
                gate.check(&alice, Action::Daily, DAY).is_err()
            }));
        }

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
