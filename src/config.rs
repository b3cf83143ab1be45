//! Support for library configuration options

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// Base URL of the task server (the part before `/tasks`, `/add_task`, etc.).
/// Feel free to override it when initing this library.
pub static API_URL: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("http://localhost:8080".to_string())));

/// File that backs the [`LocalStorage`](crate::cache::LocalStorage) key/value store.
/// Feel free to override it when initing this library.
pub static STORAGE_FILE: Lazy<Arc<Mutex<PathBuf>>> = Lazy::new(|| Arc::new(Mutex::new(PathBuf::from("task-desk-storage.json"))));

/// Storage key under which the "today" set is persisted, as a JSON array of task names
pub const TODAY_TASKS_KEY: &str = "todayTasks";

/// Returns the currently configured API URL
pub fn api_url() -> String {
    match API_URL.lock() {
        Ok(url) => url.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Override the API URL used by [`Client::from_config`](crate::client::Client::from_config)
pub fn set_api_url<S: ToString>(url: S) {
    match API_URL.lock() {
        Ok(mut current) => *current = url.to_string(),
        Err(poisoned) => *poisoned.into_inner() = url.to_string(),
    }
}

/// Returns the currently configured storage file
pub fn storage_file() -> PathBuf {
    match STORAGE_FILE.lock() {
        Ok(path) => path.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Override the file used by [`LocalStorage::from_config`](crate::cache::LocalStorage::from_config)
pub fn set_storage_file<P: Into<PathBuf>>(path: P) {
    let path = path.into();
    match STORAGE_FILE.lock() {
        Ok(mut current) => *current = path,
        Err(poisoned) => *poisoned.into_inner() = path,
    }
}
