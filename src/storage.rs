use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{ExpenseError, Result};

/// Key for the customization settings blob owned by the store.
pub const SETTINGS_KEY: &str = "customization";
/// Key for the expense sheet (rows + report details).
pub const SHEET_KEY: &str = "expense-data";
/// Key for the company logo data URI.
pub const LOGO_KEY: &str = "company-logo";
/// Key for the auto-increment report number counter.
pub const COUNTER_KEY: &str = "report-counter";

/// String-keyed durable storage. One writer at a time per key,
/// last write wins.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-per-key storage rooted at a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn storage_err(key: &str, source: std::io::Error) -> ExpenseError {
        ExpenseError::Storage {
            key: key.to_string(),
            source,
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::storage_err(key, e)),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| Self::storage_err(key, e))?;
        fs::write(self.path(key), value).map_err(|e| Self::storage_err(key, e))
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::storage_err(key, e)),
        }
    }
}

/// In-memory storage used by tests and as a throwaway backend.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_storage_round_trip() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));

        assert_eq!(storage.get("customization").unwrap(), None);
        storage.put("customization", "{\"a\":1}").unwrap();
        assert_eq!(
            storage.get("customization").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        storage.remove("customization").unwrap();
        assert_eq!(storage.get("customization").unwrap(), None);
        // Removing a missing key is not an error.
        storage.remove("customization").unwrap();
    }

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        storage.put("report-counter", "10001").unwrap();
        assert_eq!(
            storage.get("report-counter").unwrap().as_deref(),
            Some("10001")
        );
        storage.remove("report-counter").unwrap();
        assert_eq!(storage.get("report-counter").unwrap(), None);
    }
}
