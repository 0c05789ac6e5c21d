//! Generic JSON-backed record repository
//!
//! Each record type lives in its own versioned file under the data
//! directory. Records keep insertion order; type-specific queries are added
//! as inherent impls in the per-entity modules.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{BankError, BankResult};

use super::file_io::{read_json_value, write_json_atomic};
use super::migrate::{decode, VersionedFile};

/// A persisted record type
pub trait Record: Serialize + DeserializeOwned + Clone {
    type Id: Copy + Eq + Display;

    /// Storage key, also the file stem ("spending_limits")
    const KEY: &'static str;

    /// Human-readable entity name for errors ("Spending limit")
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    /// Upgrade one raw record from schema version `from` to `from + 1`
    fn migrate(_from: u32, record: Value) -> BankResult<Value> {
        Ok(record)
    }
}

/// Repository holding all records of one type
pub struct Repository<T: Record> {
    path: PathBuf,
    data: RwLock<Vec<T>>,
}

impl<T: Record> Repository<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> BankResult<RwLockReadGuard<'_, Vec<T>>> {
        self.data
            .read()
            .map_err(|e| BankError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> BankResult<RwLockWriteGuard<'_, Vec<T>>> {
        self.data
            .write()
            .map_err(|e| BankError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load records from disk, migrating older files in memory
    pub fn load(&self) -> BankResult<()> {
        let records = match read_json_value(&self.path)? {
            Some(doc) => {
                let (records, migrated) = decode::<T>(doc)?;
                if migrated {
                    info!(key = T::KEY, count = records.len(), "migrated record file");
                }
                records
            }
            None => Vec::new(),
        };

        debug!(key = T::KEY, count = records.len(), "loaded records");
        *self.write()? = records;
        Ok(())
    }

    /// Save records to disk in the current schema
    pub fn save(&self) -> BankResult<()> {
        let data = self.read()?;
        write_json_atomic(&self.path, &VersionedFile::current(data.clone()))
    }

    pub fn get(&self, id: T::Id) -> BankResult<Option<T>> {
        Ok(self.read()?.iter().find(|r| r.id() == id).cloned())
    }

    /// Get a record or a NotFound error
    pub fn require(&self, id: T::Id) -> BankResult<T> {
        self.get(id)?.ok_or_else(|| BankError::NotFound {
            entity_type: T::ENTITY,
            identifier: id.to_string(),
        })
    }

    pub fn get_all(&self) -> BankResult<Vec<T>> {
        Ok(self.read()?.clone())
    }

    /// First record matching a predicate
    pub fn find<F>(&self, predicate: F) -> BankResult<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().find(|r| predicate(r)).cloned())
    }

    /// All records matching a predicate
    pub fn filter<F>(&self, predicate: F) -> BankResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().filter(|r| predicate(r)).cloned().collect())
    }

    /// Replace a record with the same id, or append a new one
    pub fn upsert(&self, record: T) -> BankResult<()> {
        let mut data = self.write()?;
        match data.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record,
            None => data.push(record),
        }
        Ok(())
    }

    /// Insert a new record in front of the others
    pub fn prepend(&self, record: T) -> BankResult<()> {
        self.write()?.insert(0, record);
        Ok(())
    }

    /// Remove a record, returning it if it existed
    pub fn delete(&self, id: T::Id) -> BankResult<Option<T>> {
        let mut data = self.write()?;
        let position = data.iter().position(|r| r.id() == id);
        Ok(position.map(|index| data.remove(index)))
    }

    /// Replace the whole collection
    pub fn replace_all(&self, records: Vec<T>) -> BankResult<()> {
        *self.write()? = records;
        Ok(())
    }

    pub fn count(&self) -> BankResult<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, SpendingLimit};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, Repository<SpendingLimit>) {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::new(temp_dir.path().join("spending_limits.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let (_temp_dir, repo) = create_test_repo();
        let first = SpendingLimit::new("Cafe", Money::from_units(3000));
        let second = SpendingLimit::new("Taxi", Money::from_units(2000));
        repo.upsert(first.clone()).unwrap();
        repo.upsert(second).unwrap();

        let mut edited = first.clone();
        edited.limit = Money::from_units(4000);
        repo.upsert(edited).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first.id);
        assert_eq!(all[0].limit, Money::from_units(4000));
    }

    #[test]
    fn test_save_and_reload_writes_envelope() {
        let (temp_dir, repo) = create_test_repo();
        let limit = SpendingLimit::new("Cafe", Money::from_units(3000));
        let id = limit.id;
        repo.upsert(limit).unwrap();
        repo.save().unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join("spending_limits.json")).unwrap();
        let doc: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["schema_version"], 1);

        let repo2: Repository<SpendingLimit> =
            Repository::new(temp_dir.path().join("spending_limits.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.require(id).unwrap().category, "Cafe");
    }

    #[test]
    fn test_prepend_and_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let a = SpendingLimit::new("A", Money::from_units(1));
        let b = SpendingLimit::new("B", Money::from_units(1));
        repo.upsert(a.clone()).unwrap();
        repo.prepend(b.clone()).unwrap();
        assert_eq!(repo.get_all().unwrap()[0].id, b.id);

        assert!(repo.delete(a.id).unwrap().is_some());
        assert!(repo.delete(a.id).unwrap().is_none());
        assert!(repo.require(a.id).unwrap_err().is_not_found());
    }
}
