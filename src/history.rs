//! Drink log.
//!
//! Every logged drink lands in the `waterHistory` key as a JSON array of
//! points; the history view folds them into per-day totals.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StoreError, KEY_WATER_HISTORY};

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct DrinkPoint {
    /// Timestamp of when the drink was recorded
    pub timestamp: i64,

    /// Amount of water drank in milliliters
    pub amount: f64,
}

impl DrinkPoint {
    pub fn new(amount: f64) -> Self {
        Self {
            timestamp: Utc::now().timestamp(),
            amount,
        }
    }

    pub fn at(timestamp: i64, amount: f64) -> Self {
        Self { timestamp, amount }
    }
}

pub async fn load_history(store: &dyn KeyValueStore) -> Result<Vec<DrinkPoint>, StoreError> {
    match store.get(KEY_WATER_HISTORY).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

pub async fn append_drink(
    store: &mut dyn KeyValueStore,
    point: DrinkPoint,
) -> Result<(), StoreError> {
    let mut points = load_history(store).await?;
    points.push(point);
    store
        .set(KEY_WATER_HISTORY, &serde_json::to_string(&points)?)
        .await
}

/// Intake totals grouped by local calendar date, oldest first.
pub fn daily_totals(points: &[DrinkPoint]) -> BTreeMap<NaiveDate, f64> {
    let mut grouped: BTreeMap<NaiveDate, f64> = BTreeMap::new();

    for point in points {
        let Some(recorded) = DateTime::from_timestamp(point.timestamp, 0) else {
            continue;
        };
        let day = recorded.with_timezone(&Local).date_naive();
        *grouped.entry(day).or_insert(0.0) += point.amount;
    }

    grouped
}
