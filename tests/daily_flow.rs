//! End-to-end: derive a goal, drink through a day, survive a restart and
//! a day rollover, all against the on-disk store.

use aqualog::goal::{compute_goal, ActivityLevel, Climate};
use aqualog::history;
use aqualog::intake::IntakeTracker;
use aqualog::storage::{
    JsonFileStore, KeyValueStore, KEY_CURRENT_INTAKE, KEY_DAILY_GOAL, KEY_LAST_TRACKED_DATE,
};
use chrono::NaiveDate;

#[tokio::test]
async fn goal_drink_restart_rollover() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    let day_one = NaiveDate::from_ymd_opt(2026, 8, 5).unwrap();
    let day_two = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

    // Set the goal and drink twice.
    let mut store = JsonFileStore::open(path.clone()).await.unwrap();
    let goal = compute_goal(70.0, ActivityLevel::Sedentary, Climate::Temperate).unwrap();
    assert_eq!(goal, 2450);
    store.set(KEY_DAILY_GOAL, &goal.to_string()).await.unwrap();

    let mut tracker = IntakeTracker::load(store, day_one).await.unwrap();
    tracker.drink(250.0).await.unwrap();
    let state = tracker.drink(500.0).await.unwrap();
    assert_eq!(state.current_intake_ml, 750.0);
    assert_eq!(state.remaining_ml, 1700.0);
    drop(tracker);

    // Same-day restart picks up where we left off.
    let store = JsonFileStore::open(path.clone()).await.unwrap();
    let tracker = IntakeTracker::load(store, day_one).await.unwrap();
    assert_eq!(tracker.state().current_intake_ml, 750.0);
    assert_eq!(tracker.state().remaining_ml, 1700.0);
    drop(tracker);

    // Next-day restart rolls the intake over to zero.
    let store = JsonFileStore::open(path.clone()).await.unwrap();
    let mut tracker = IntakeTracker::load(store, day_two).await.unwrap();
    assert_eq!(tracker.state().current_intake_ml, 0.0);
    assert_eq!(tracker.state().remaining_ml, 2450.0);

    tracker.drink(300.0).await.unwrap();
    drop(tracker);

    // The rollover is persisted and the drink log kept every entry.
    let store = JsonFileStore::open(path).await.unwrap();
    assert_eq!(
        store.get(KEY_LAST_TRACKED_DATE).await.unwrap(),
        Some("2026-08-06".to_string())
    );
    assert_eq!(
        store.get(KEY_CURRENT_INTAKE).await.unwrap(),
        Some("300".to_string())
    );

    let points = history::load_history(&store).await.unwrap();
    assert_eq!(points.len(), 3);
    let total: f64 = points.iter().map(|point| point.amount).sum();
    assert_eq!(total, 1050.0);
}
