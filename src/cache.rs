//! This module provides a local key/value store, used to persist client-only state such as the "today" set

use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::ViewError;
use crate::traits::TodayStore;


/// A key/value store that persists its content in a local JSON file
#[derive(Debug, PartialEq)]
pub struct LocalStorage {
    backing_file: PathBuf,
    data: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Initialize a store from the content of a valid backing file if it exists.
    /// Returns an error otherwise
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let data = match std::fs::File::open(path) {
            Err(err) => {
                return Err(format!("Unable to open file {:?}: {}", path, err).into());
            },
            Ok(file) => serde_json::from_reader(file)?,
        };

        Ok(Self{
            backing_file: PathBuf::from(path),
            data,
        })
    }

    /// Initialize an empty store, that will be saved to `path`
    pub fn new(path: &Path) -> Self {
        Self{
            backing_file: PathBuf::from(path),
            data: BTreeMap::new(),
        }
    }

    /// Open the backing file if it is valid, or start from an empty store otherwise
    pub fn open(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(storage) => storage,
            Err(err) => {
                if path.exists() {
                    log::warn!("Invalid storage file: {}. Using an empty storage", err);
                }
                Self::new(path)
            }
        }
    }

    /// Open the file set in [`config::STORAGE_FILE`](crate::config::STORAGE_FILE)
    pub fn from_config() -> Self {
        Self::open(&crate::config::storage_file())
    }

    pub fn backing_file(&self) -> &Path {
        &self.backing_file
    }

    /// Store the current content to its backing file
    fn save_to_file(&self) -> Result<(), ViewError> {
        let path = &self.backing_file;
        if let Some(folder) = path.parent() {
            if folder.as_os_str().is_empty() == false {
                std::fs::create_dir_all(folder)
                    .map_err(|err| ViewError::Storage(format!("Unable to create folder {:?}: {}", folder, err)))?;
            }
        }
        let file = std::fs::File::create(path)
            .map_err(|err| ViewError::Storage(format!("Unable to save file {:?}: {}", path, err)))?;

        serde_json::to_writer_pretty(file, &self.data)
            .map_err(|err| ViewError::Storage(format!("Unable to serialize: {}", err)))
    }
}

#[async_trait]
impl TodayStore for LocalStorage {
    async fn get_item(&self, key: &str) -> Option<String> {
        self.data.get(key).cloned()
    }

    async fn set_item(&mut self, key: &str, value: String) -> Result<(), ViewError> {
        let previous = self.data.insert(key.to_string(), value);
        if let Err(err) = self.save_to_file() {
            // Keep the content in line with what is on disk
            match previous {
                Some(previous) => self.data.insert(key.to_string(), previous),
                None => self.data.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }
}


/// A key/value store that lives in memory only
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStorage {
    data: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already contains `value` for `key`
    pub fn with_item<K: ToString, V: ToString>(key: K, value: V) -> Self {
        let mut data = BTreeMap::new();
        data.insert(key.to_string(), value.to_string());
        Self { data }
    }

    /// Synchronous access to a stored value, mostly for tests
    pub fn peek(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(|v| v.as_str())
    }
}

#[async_trait]
impl TodayStore for MemoryStorage {
    async fn get_item(&self, key: &str) -> Option<String> {
        self.data.get(key).cloned()
    }

    async fn set_item(&mut self, key: &str, value: String) -> Result<(), ViewError> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }
}
