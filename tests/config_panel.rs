//! Config panel flows
//!
//! Exercises free-text parameter submissions the way the admin UI sends
//! them: durations through the codec, plain integers, and every rejection
//! path, then verifies the tuned values actually drive the operations.

use coinbot::economy::{EcoStore, EconomyEngine, EconomyError, UserId};

async fn fresh_engine() -> EconomyEngine {
    EconomyEngine::new(EcoStore::open_in_memory().await.unwrap())
}

#[tokio::test]
async fn test_snapshot_lists_every_key_with_defaults() {
    let engine = fresh_engine().await;

    let entries = engine.config_snapshot().await.unwrap();
    assert_eq!(entries.len(), 9);

    let daily = entries.iter().find(|e| e.key == "daily_amount").unwrap();
    assert_eq!(daily.value, 100);
    assert_eq!(daily.display, "100");

    let cooldown = entries.iter().find(|e| e.key == "daily_cooldown").unwrap();
    assert_eq!(cooldown.value, 86_400);
    assert_eq!(cooldown.display, "1 day");
}

#[tokio::test]
async fn test_set_duration_from_compound_text() {
    let engine = fresh_engine().await;

    let entry = engine.set_config("daily_cooldown", "1h30m").await.unwrap();
    assert_eq!(entry.value, 5400);
    assert_eq!(entry.display, "1 hour 30m");

    let entry = engine.get_config("daily_cooldown").await.unwrap();
    assert_eq!(entry.value, 5400);
}

#[tokio::test]
async fn test_set_duration_accepts_french_day_unit() {
    let engine = fresh_engine().await;

    let entry = engine.set_config("steal_cooldown", "2j").await.unwrap();
    assert_eq!(entry.value, 172_800);
    assert_eq!(entry.display, "2 days");
}

#[tokio::test]
async fn test_set_integer_value() {
    let engine = fresh_engine().await;

    let entry = engine.set_config("daily_amount", "250").await.unwrap();
    assert_eq!(entry.value, 250);
    assert_eq!(entry.display, "250");

    // the tuned amount drives the next daily claim
    let receipt = engine.daily(&UserId::from("alice")).await.unwrap();
    assert_eq!(receipt.amount, 250);
    assert_eq!(receipt.balance, 350);
}

#[tokio::test]
async fn test_rejects_unparseable_duration() {
    let engine = fresh_engine().await;

    assert!(matches!(
        engine.set_config("daily_cooldown", "banana").await.unwrap_err(),
        EconomyError::InvalidDuration(_)
    ));

    // "0s" parses to zero, which cannot be a cooldown
    assert!(matches!(
        engine.set_config("daily_cooldown", "0s").await.unwrap_err(),
        EconomyError::InvalidDuration(_)
    ));
}

#[tokio::test]
async fn test_rejects_unparseable_integer() {
    let engine = fresh_engine().await;

    assert!(matches!(
        engine.set_config("daily_amount", "12.5").await.unwrap_err(),
        EconomyError::InvalidNumber(_)
    ));
    assert!(matches!(
        engine.set_config("steal_max_per_day", "many").await.unwrap_err(),
        EconomyError::InvalidNumber(_)
    ));
}

#[tokio::test]
async fn test_rejects_unknown_key() {
    let engine = fresh_engine().await;

    assert!(matches!(
        engine.set_config("weekly_amount", "100").await.unwrap_err(),
        EconomyError::UnknownKey(_)
    ));
    assert!(matches!(
        engine.get_config("weekly_amount").await.unwrap_err(),
        EconomyError::UnknownKey(_)
    ));
}

#[tokio::test]
async fn test_tuned_quota_limit_drives_theft() {
    let engine = fresh_engine().await;
    let actor = UserId::from("actor");

    engine.set_config("steal_max_per_day", "1").await.unwrap();

    engine.steal(&actor, &UserId::from("bob")).await.unwrap();
    match engine.steal(&actor, &UserId::from("carol")).await.unwrap_err() {
        EconomyError::QuotaExceeded { limit, .. } => assert_eq!(limit, 1),
        other => panic!("expected QuotaExceeded, got {other:?}"),
    }
}

#[tokio::test]
async fn test_tuned_bounds_pin_the_theft_draw() {
    let engine = fresh_engine().await;

    // min == max collapses the draw to a single value
    engine.set_config("steal_min_amount", "25").await.unwrap();
    engine.set_config("steal_max_amount", "25").await.unwrap();

    let receipt = engine
        .steal(&UserId::from("actor"), &UserId::from("target"))
        .await
        .unwrap();
    assert_eq!(receipt.amount, 25);
}
