use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::Result;

/// Durable key/value store, the local-storage of the site.
pub trait Storage {
    fn read(&self, key: &str) -> Option<String>;
    fn persist(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store, handy for tests and one-shot renders.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::new();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn persist(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Key/value store backed by a single JSON object on disk.
///
/// The file is re-read on every access so two processes sharing it see
/// each other's writes.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the user's data directory (cross-platform)
    pub fn default_location() -> Self {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("folio");
        path.push("local_storage.json");
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> BTreeMap<String, String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!(
                        "Failed to parse storage file {}: {}. Starting empty.",
                        self.path.display(),
                        e
                    );
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        }
    }
}

impl Storage for JsonFileStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }

    fn persist(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(&self.path, json)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.read("theme"), None);
        storage.persist("theme", "dark").unwrap();
        assert_eq!(storage.read("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_json_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut first = JsonFileStorage::new(&path);
        first.persist("theme", "dark").unwrap();
        first.persist("other", "value").unwrap();

        let second = JsonFileStorage::new(&path);
        assert_eq!(second.read("theme").as_deref(), Some("dark"));
        assert_eq!(second.read("other").as_deref(), Some("value"));
    }

    #[test]
    fn test_json_storage_overwrites_value() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonFileStorage::new(dir.path().join("storage.json"));
        storage.persist("theme", "dark").unwrap();
        storage.persist("theme", "light").unwrap();
        assert_eq!(storage.read("theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_json_storage_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let mut storage = JsonFileStorage::new(&path);
        assert_eq!(storage.read("theme"), None);
        storage.persist("theme", "light").unwrap();
        assert_eq!(storage.read("theme").as_deref(), Some("light"));
    }
}
