//! Key/value persistence
//!
//! Profiles and settings are stored as JSON strings under fixed keys.
//! On the web the backend is LocalStorage; tests and the native build use
//! an in-memory map. Callers treat every error as "start from defaults".

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage is not available")]
    Unavailable,

    #[error("Failed to read key '{0}'")]
    Read(String),

    #[error("Failed to write key '{0}'")]
    Write(String),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// String key/value store
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value. `Ok(None)` when the key is absent.
pub fn load_json<T, S>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    match storage.get(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T, S>(storage: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: Storage + ?Sized,
{
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

/// In-memory backend
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
    available: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            available: true,
        }
    }

    /// A backend that fails every call, like LocalStorage in private mode
    pub fn unavailable() -> Self {
        Self {
            entries: HashMap::new(),
            available: false,
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable)
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let inner = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if inner.is_none() {
            log::warn!("LocalStorage unavailable, progress will not be saved");
        }
        Self { inner }
    }

    fn inner(&self) -> Result<&web_sys::Storage, StorageError> {
        self.inner.as_ref().ok_or(StorageError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner()?
            .get_item(key)
            .map_err(|_| StorageError::Read(key.to_string()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // Fails when the quota is exceeded
        self.inner()?
            .set_item(key, value)
            .map_err(|_| StorageError::Write(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_json_round_trip() {
        let mut storage = MemoryStorage::new();
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1u32);
        save_json(&mut storage, "k", &map).unwrap();
        let loaded: Option<BTreeMap<String, u32>> = load_json(&storage, "k").unwrap();
        assert_eq!(loaded, Some(map));
    }

    #[test]
    fn test_missing_key_is_none() {
        let storage = MemoryStorage::new();
        let loaded: Option<u32> = load_json(&storage, "nothing").unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn test_corrupt_json_is_serde_error() {
        let storage = MemoryStorage::new().with_entry("k", "{not json");
        let err = load_json::<u32, _>(&storage, "k").unwrap_err();
        assert!(matches!(err, StorageError::Serde(_)));
    }

    #[test]
    fn test_unavailable_backend() {
        let mut storage = MemoryStorage::unavailable();
        assert!(matches!(storage.get("k"), Err(StorageError::Unavailable)));
        assert!(matches!(
            save_json(&mut storage, "k", &1u32),
            Err(StorageError::Unavailable)
        ));
    }
}
