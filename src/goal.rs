//! Daily goal derivation from the user's profile.
//!
//! The goal is the classic 35 mL-per-kg baseline scaled by activity level
//! and climate. Pure arithmetic; persistence is the caller's problem.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Baseline recommendation in milliliters per kilogram of body weight.
pub const BASE_ML_PER_KG: f64 = 35.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActivityLevel {
    Sedentary,
    LightActivity,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightActivity,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtremelyActive,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.0,
            ActivityLevel::LightActivity => 1.35,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.7,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }
}

impl std::fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightActivity => "Light Activity",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
            ActivityLevel::ExtremelyActive => "Extremely Active",
        };
        f.write_str(label)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Climate {
    Tropical,
    Temperate,
    Cold,
}

impl Climate {
    pub const ALL: [Climate; 3] = [Climate::Tropical, Climate::Temperate, Climate::Cold];

    pub fn multiplier(self) -> f64 {
        match self {
            Climate::Tropical => 1.1,
            Climate::Temperate => 1.0,
            Climate::Cold => 0.9,
        }
    }
}

impl std::fmt::Display for Climate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Climate::Tropical => "Tropical",
            Climate::Temperate => "Temperate",
            Climate::Cold => "Cold",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GoalError {
    #[error("weight must be a positive number of kilograms")]
    InvalidWeight,
}

/// Derives the daily water goal in milliliters.
///
/// Deterministic; rejects non-positive or non-finite weights so the caller
/// can re-prompt instead of persisting garbage.
pub fn compute_goal(
    weight_kg: f64,
    activity: ActivityLevel,
    climate: Climate,
) -> Result<u32, GoalError> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(GoalError::InvalidWeight);
    }

    let ml = weight_kg * BASE_ML_PER_KG * activity.multiplier() * climate.multiplier();
    Ok(ml.round() as u32)
}
