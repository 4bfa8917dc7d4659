//! Daily-stats persistence with per-user locking.
//!
//! Each user's record is one JSON document. Updates run load-modify-save
//! under an exclusive lock so a rollover check and the mutation that follows
//! it are never interleaved with another writer for the same user.

use crate::{DailyStatsRecord, Error, Result, UserId};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// Key-value store holding one `DailyStatsRecord` per user
pub trait StatsStore {
    /// Read the record, defaulting when none exists yet
    fn load(&self, user: &UserId) -> Result<DailyStatsRecord>;

    /// Load, modify and save the record as one serialized step
    fn update<T, F>(&self, user: &UserId, f: F) -> Result<T>
    where
        F: FnOnce(&mut DailyStatsRecord) -> Result<T>;
}

impl<S: StatsStore + ?Sized> StatsStore for &S {
    fn load(&self, user: &UserId) -> Result<DailyStatsRecord> {
        (**self).load(user)
    }

    fn update<T, F>(&self, user: &UserId, f: F) -> Result<T>
    where
        F: FnOnce(&mut DailyStatsRecord) -> Result<T>,
    {
        (**self).update(user, f)
    }
}

impl<S: StatsStore + ?Sized> StatsStore for Arc<S> {
    fn load(&self, user: &UserId) -> Result<DailyStatsRecord> {
        (**self).load(user)
    }

    fn update<T, F>(&self, user: &UserId, f: F) -> Result<T>
    where
        F: FnOnce(&mut DailyStatsRecord) -> Result<T>,
    {
        (**self).update(user, f)
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// One JSON file per user under a directory, guarded by a sidecar lock file
#[derive(Clone, Debug)]
pub struct JsonStatsStore {
    dir: PathBuf,
}

impl JsonStatsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the record document for a user
    pub fn record_path(&self, user: &UserId) -> PathBuf {
        self.dir.join(format!("{}.json", user.file_stem()))
    }

    fn lock_path(&self, user: &UserId) -> PathBuf {
        self.dir.join(format!("{}.lock", user.file_stem()))
    }

    fn open_lock(&self, user: &UserId) -> Result<File> {
        std::fs::create_dir_all(&self.dir)?;
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path(user))?;
        Ok(file)
    }

    /// Read a record without locking. Missing or corrupted documents yield
    /// the default record.
    fn read_record(path: &Path) -> Result<DailyStatsRecord> {
        if !path.exists() {
            tracing::debug!("No stats file at {:?}, starting from defaults", path);
            return Ok(DailyStatsRecord::default());
        }

        let mut contents = String::new();
        if let Err(e) = File::open(path).and_then(|mut f| f.read_to_string(&mut contents)) {
            tracing::warn!(
                "Failed to read stats file {:?}: {}. Using defaults.",
                path,
                e
            );
            return Ok(DailyStatsRecord::default());
        }

        match serde_json::from_str::<DailyStatsRecord>(&contents) {
            Ok(record) => {
                tracing::debug!("Loaded daily stats from {:?}", path);
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse stats file {:?}: {}. Using defaults.",
                    path,
                    e
                );
                Ok(DailyStatsRecord::default())
            }
        }
    }

    /// Atomically replace the record: temp file, fsync, rename.
    fn write_record(path: &Path, record: &DailyStatsRecord) -> Result<()> {
        let parent = path.parent().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "stats path missing parent",
            ))
        })?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(record)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved daily stats to {:?}", path);
        Ok(())
    }
}

impl StatsStore for JsonStatsStore {
    fn load(&self, user: &UserId) -> Result<DailyStatsRecord> {
        let path = self.record_path(user);
        if !path.exists() {
            return Ok(DailyStatsRecord::default());
        }

        let lock = self.open_lock(user)?;
        lock.lock_shared()?;
        let record = Self::read_record(&path);
        lock.unlock()?;
        record
    }

    fn update<T, F>(&self, user: &UserId, f: F) -> Result<T>
    where
        F: FnOnce(&mut DailyStatsRecord) -> Result<T>,
    {
        let path = self.record_path(user);
        let lock = self.open_lock(user)?;
        lock.lock_exclusive()?;

        let result: Result<T> = (|| {
            let before = Self::read_record(&path)?;
            let mut record = before.clone();
            let out = f(&mut record)?;
            if record != before || !path.exists() {
                Self::write_record(&path, &record)?;
            }
            Ok(out)
        })();

        lock.unlock()?;
        result
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local store; the map lock serializes every update
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    records: Mutex<HashMap<UserId, DailyStatsRecord>>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<std::sync::MutexGuard<'_, HashMap<UserId, DailyStatsRecord>>> {
        self.records
            .lock()
            .map_err(|_| Error::Other("stats store lock poisoned".into()))
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self, user: &UserId) -> Result<DailyStatsRecord> {
        Ok(self.records()?.get(user).cloned().unwrap_or_default())
    }

    fn update<T, F>(&self, user: &UserId, f: F) -> Result<T>
    where
        F: FnOnce(&mut DailyStatsRecord) -> Result<T>,
    {
        let mut records = self.records()?;
        let mut record = records.get(user).cloned().unwrap_or_default();
        let out = f(&mut record)?;
        records.insert(user.clone(), record);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn user() -> UserId {
        UserId::new("ada@example.edu")
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(temp_dir.path());

        store
            .update(&user(), |record| {
                record.total_calories = 640;
                record.total_points = 20;
                record.last_check_in_date = Some("2024-01-15".into());
                record.calorie_goal_lower = 1800;
                record.calorie_goal_upper = 2200;
                Ok(())
            })
            .unwrap();

        let loaded = store.load(&user()).unwrap();
        assert_eq!(loaded.total_calories, 640);
        assert_eq!(loaded.total_points, 20);
        assert_eq!(loaded.last_check_in_date.as_deref(), Some("2024-01-15"));
        assert_eq!(loaded.calorie_goal_lower, 1800);
        assert_eq!(loaded.calorie_goal_upper, 2200);
    }

    #[test]
    fn test_document_uses_record_keys() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(temp_dir.path());

        store
            .update(&user(), |record| {
                record.total_calories = 10;
                record.last_reset_timestamp = Some(1_705_300_000_000);
                Ok(())
            })
            .unwrap();

        let raw = std::fs::read_to_string(store.record_path(&user())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["totalCalories"], 10);
        assert_eq!(value["lastResetTimestamp"], 1_705_300_000_000i64);
        assert_eq!(value["totalPoints"], 0);
        assert!(value.get("calorieGoalLower").is_some());
        assert!(value.get("calorieGoalUpper").is_some());
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(temp_dir.path().join("stats"));

        let record = store.load(&user()).unwrap();
        assert_eq!(record, DailyStatsRecord::default());
    }

    #[test]
    fn test_corrupted_record_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(temp_dir.path());
        std::fs::write(store.record_path(&user()), "{ invalid json }").unwrap();

        let record = store.load(&user()).unwrap();
        assert_eq!(record, DailyStatsRecord::default());
    }

    #[test]
    fn test_failed_update_leaves_record_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(temp_dir.path());
        store
            .update(&user(), |record| {
                record.total_points = 50;
                Ok(())
            })
            .unwrap();

        let result: Result<()> = store.update(&user(), |record| {
            record.total_points = 0;
            Err(Error::Other("abort".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.load(&user()).unwrap().total_points, 50);
    }

    #[test]
    fn test_users_are_isolated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(temp_dir.path());
        let other = UserId::new("grace@example.edu");

        store
            .update(&user(), |record| {
                record.total_points = 30;
                Ok(())
            })
            .unwrap();

        assert_eq!(store.load(&other).unwrap().total_points, 0);
    }

    #[test]
    fn test_escaped_and_literal_ids_are_isolated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = JsonStatsStore::new(temp_dir.path());
        let lookalike = UserId::new("ada_example.edu");

        store
            .update(&user(), |record| {
                record.total_points = 30;
                Ok(())
            })
            .unwrap();

        assert_eq!(store.load(&lookalike).unwrap().total_points, 0);
        assert_ne!(store.record_path(&user()), store.record_path(&lookalike));
    }

    #[test]
    fn test_concurrent_updates_are_serialized() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(JsonStatsStore::new(temp_dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..10 {
                        store
                            .update(&user(), |record| {
                                record.total_calories += 10;
                                Ok(())
                            })
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load(&user()).unwrap().total_calories, 800);
    }

    #[test]
    fn test_memory_store_update_and_load() {
        let store = MemoryStatsStore::new();
        let total = store
            .update(&user(), |record| {
                record.total_calories += 120;
                Ok(record.total_calories)
            })
            .unwrap();

        assert_eq!(total, 120);
        assert_eq!(store.load(&user()).unwrap().total_calories, 120);
    }
}
