//! Key-value persistence.
//!
//! The tracker's whole persistent footprint is a handful of string pairs,
//! kept as one JSON object in a single file under the platform data
//! directory. The [`KeyValueStore`] trait is the seam the rest of the
//! crate talks through; [`MemoryStore`] backs tests and throwaway
//! sessions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use directories::ProjectDirs;
use thiserror::Error;

pub const KEY_DAILY_GOAL: &str = "dailyGoal";
pub const KEY_CURRENT_INTAKE: &str = "currentIntake";
pub const KEY_REMAINING_WATER: &str = "remainingWater";
pub const KEY_LAST_TRACKED_DATE: &str = "lastTrackedDate";
pub const KEY_UNIT: &str = "unit";
pub const KEY_WEIGHT_UNIT: &str = "weight";
pub const KEY_WATER_HISTORY: &str = "waterHistory";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unable to access the data file: {0}")]
    Io(#[from] std::io::Error),
    #[error("data file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Platform data directory for aqualog, e.g. `~/.local/share/aqualog`.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("fyi", "angelo", "aqualog").map(|dirs| dirs.data_dir().to_path_buf())
}

/// The on-disk store: one JSON object, read once at open, rewritten on
/// every set.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) if !bytes.is_empty() => serde_json::from_slice(&bytes)?,
            Ok(_) => BTreeMap::new(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self { path, entries })
    }

    async fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush().await
    }
}

/// Volatile store with the same shape as the file-backed one.
#[derive(Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
