//! Today's intake against the daily goal, with day rollover.
//!
//! The tracker is a two-state machine keyed on the persisted
//! `lastTrackedDate` stamp: a stale stamp (or none at all) means the day
//! rolled over and intake resets to zero; a fresh stamp means the stored
//! values still describe today. Dates are plain local calendar dates in
//! ISO form, never locale-formatted strings.
//!
//! Write failures never abort an operation: the in-memory state stays
//! authoritative for the session and the failure is logged.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::history::{self, DrinkPoint};
use crate::storage::{
    KeyValueStore, StoreError, KEY_CURRENT_INTAKE, KEY_DAILY_GOAL, KEY_LAST_TRACKED_DATE,
    KEY_REMAINING_WATER,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntakeState {
    pub date: NaiveDate,
    pub daily_goal_ml: f64,
    pub current_intake_ml: f64,
    pub remaining_ml: f64,
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("no daily goal set; run `aqualog goal` first")]
    NoGoal,
    #[error("drink amount must be a positive number of milliliters")]
    InvalidAmount,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct IntakeTracker<S: KeyValueStore> {
    store: S,
    state: IntakeState,
}

impl<S: KeyValueStore> IntakeTracker<S> {
    /// Loads today's state, resetting it first when the stored date stamp
    /// is missing or differs from `today`. Loading twice on the same date
    /// without drinking yields the same state.
    pub async fn load(mut store: S, today: NaiveDate) -> Result<Self, IntakeError> {
        let goal = match store.get(KEY_DAILY_GOAL).await? {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|goal| goal.is_finite() && *goal > 0.0)
                .ok_or(IntakeError::NoGoal)?,
            None => return Err(IntakeError::NoGoal),
        };

        let stored_date = store
            .get(KEY_LAST_TRACKED_DATE)
            .await?
            .and_then(|stamp| NaiveDate::parse_from_str(&stamp, DATE_FORMAT).ok());

        let state = if stored_date == Some(today) {
            let intake = store
                .get(KEY_CURRENT_INTAKE)
                .await?
                .and_then(|raw| raw.parse::<f64>().ok())
                .unwrap_or(0.0);
            let remaining = store
                .get(KEY_REMAINING_WATER)
                .await?
                .and_then(|raw| raw.parse::<f64>().ok())
                .unwrap_or_else(|| (goal - intake).max(0.0));

            IntakeState {
                date: today,
                daily_goal_ml: goal,
                current_intake_ml: intake,
                remaining_ml: remaining,
            }
        } else {
            info!(date = %today, "day rolled over, starting intake from zero");
            let state = IntakeState {
                date: today,
                daily_goal_ml: goal,
                current_intake_ml: 0.0,
                remaining_ml: goal,
            };
            persist_state(&mut store, &state).await;
            state
        };

        Ok(Self { store, state })
    }

    pub fn state(&self) -> IntakeState {
        self.state
    }

    /// Logs a drink: accumulates intake (deliberately not clamped to the
    /// goal), floors the remainder at zero, persists both values and
    /// appends the drink to the history log.
    pub async fn drink(&mut self, amount_ml: f64) -> Result<IntakeState, IntakeError> {
        if !amount_ml.is_finite() || amount_ml <= 0.0 {
            return Err(IntakeError::InvalidAmount);
        }

        self.state.current_intake_ml += amount_ml;
        self.state.remaining_ml = (self.state.daily_goal_ml - self.state.current_intake_ml).max(0.0);

        persist_state(&mut self.store, &self.state).await;

        if let Err(err) = history::append_drink(&mut self.store, DrinkPoint::new(amount_ml)).await {
            warn!(%err, "failed to append drink to history");
        }

        Ok(self.state)
    }
}

/// Best effort: a store that refuses writes costs us durability, not the
/// session. Amounts go in as plain decimal strings.
async fn persist_state<S: KeyValueStore>(store: &mut S, state: &IntakeState) {
    let result = async {
        store
            .set(
                KEY_LAST_TRACKED_DATE,
                &state.date.format(DATE_FORMAT).to_string(),
            )
            .await?;
        store
            .set(KEY_CURRENT_INTAKE, &state.current_intake_ml.to_string())
            .await?;
        store
            .set(KEY_REMAINING_WATER, &state.remaining_ml.to_string())
            .await
    }
    .await;

    if let Err(err) = result {
        warn!(%err, "failed to persist intake state, keeping in-memory values");
    }
}
