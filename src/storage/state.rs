//! Single-document state files
//!
//! Small pieces of state that are not collections of records: the set of
//! dismissed spending alerts and the PIN hash.

use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::calc::AlertLevel;
use crate::error::{BankError, BankResult};

use super::file_io::{read_json, write_json_atomic};
use super::migrate::CURRENT_SCHEMA_VERSION;

/// A dismissed alert, keyed by category and tier
///
/// Escalating from warning to exceeded produces a new key, so the stronger
/// alert shows again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DismissedAlert {
    pub category: String,
    pub level: AlertLevel,
}

impl DismissedAlert {
    pub fn new(category: &str, level: AlertLevel) -> Self {
        Self {
            category: category.trim().to_lowercase(),
            level,
        }
    }
}

/// Persisted alert state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertState {
    #[serde(default = "current_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub dismissed: Vec<DismissedAlert>,
}

impl Default for AlertState {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            dismissed: Vec::new(),
        }
    }
}

/// Persisted PIN lock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinState {
    #[serde(default = "current_version")]
    pub schema_version: u32,
    /// Argon2 PHC string
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for PinState {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            hash: None,
            updated_at: None,
        }
    }
}

fn current_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

/// A JSON file holding one document of type `T`
pub struct DocumentStore<T> {
    path: PathBuf,
    data: RwLock<T>,
}

impl<T> DocumentStore<T>
where
    T: Serialize + DeserializeOwned + Default + Clone,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(T::default()),
        }
    }

    pub fn load(&self) -> BankResult<()> {
        let loaded: T = read_json(&self.path)?;
        *self
            .data
            .write()
            .map_err(|e| BankError::Storage(format!("Failed to acquire write lock: {}", e)))? =
            loaded;
        Ok(())
    }

    pub fn save(&self) -> BankResult<()> {
        let data = self
            .data
            .read()
            .map_err(|e| BankError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        write_json_atomic(&self.path, &*data)
    }

    pub fn get(&self) -> BankResult<T> {
        Ok(self
            .data
            .read()
            .map_err(|e| BankError::Storage(format!("Failed to acquire read lock: {}", e)))?
            .clone())
    }

    /// Mutate the document in memory and persist it
    pub fn update<F>(&self, mutate: F) -> BankResult<()>
    where
        F: FnOnce(&mut T),
    {
        {
            let mut data = self
                .data
                .write()
                .map_err(|e| BankError::Storage(format!("Failed to acquire write lock: {}", e)))?;
            mutate(&mut data);
        }
        self.save()
    }
}
