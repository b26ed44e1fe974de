//! Display and input unit preferences.

use clap::ValueEnum;
use thiserror::Error;

use crate::storage::{KeyValueStore, StoreError, KEY_UNIT, KEY_WEIGHT_UNIT};

const LBS_PER_KG: f64 = 2.204_622_621_8;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum VolumeUnit {
    #[default]
    Ml,
    Litres,
}

impl VolumeUnit {
    pub fn as_key(self) -> &'static str {
        match self {
            VolumeUnit::Ml => "ml",
            VolumeUnit::Litres => "litres",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "ml" => Some(VolumeUnit::Ml),
            "litres" => Some(VolumeUnit::Litres),
            _ => None,
        }
    }

    /// Renders a milliliter amount in this unit.
    pub fn format(self, ml: f64) -> String {
        match self {
            VolumeUnit::Ml => format!("{ml:.0} mL"),
            VolumeUnit::Litres => format!("{:.2} L", ml / 1000.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub fn as_key(self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "kg" => Some(WeightUnit::Kg),
            "lbs" => Some(WeightUnit::Lbs),
            _ => None,
        }
    }

    /// Converts a weight given in this unit to kilograms.
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            WeightUnit::Kg => value,
            WeightUnit::Lbs => value / LBS_PER_KG,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub unit: VolumeUnit,
    pub weight: WeightUnit,
}

/// Unknown or missing stored values fall back to the defaults (ml, kg).
pub async fn load(store: &dyn KeyValueStore) -> Result<Preferences, PrefsError> {
    let unit = store
        .get(KEY_UNIT)
        .await?
        .and_then(|raw| VolumeUnit::from_key(&raw))
        .unwrap_or_default();
    let weight = store
        .get(KEY_WEIGHT_UNIT)
        .await?
        .and_then(|raw| WeightUnit::from_key(&raw))
        .unwrap_or_default();

    Ok(Preferences { unit, weight })
}

pub async fn save(store: &mut dyn KeyValueStore, prefs: Preferences) -> Result<(), PrefsError> {
    store.set(KEY_UNIT, prefs.unit.as_key()).await?;
    store.set(KEY_WEIGHT_UNIT, prefs.weight.as_key()).await?;
    Ok(())
}
