use std::path::{Path, PathBuf};

use repojump_utils::fs::{read_optional, write_atomic};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::StorageError;

pub type StorageMap = Map<String, Value>;

/// Durable key-value storage consumed by the settings store.
///
/// Mirrors the browser extension storage area: `get` returns only the keys
/// that exist, `set` merges the given keys over the stored ones.
pub trait Storage {
    /// Reads `keys`, or every stored key when `keys` is `None`.
    fn get(&self, keys: Option<&[&str]>) -> Result<StorageMap, StorageError>;

    fn set(&mut self, items: StorageMap) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get(&self, keys: Option<&[&str]>) -> Result<StorageMap, StorageError> {
        (**self).get(keys)
    }

    fn set(&mut self, items: StorageMap) -> Result<(), StorageError> {
        (**self).set(items)
    }
}

fn select(data: &StorageMap, keys: Option<&[&str]>) -> StorageMap {
    match keys {
        None => data.clone(),
        Some(keys) => {
            keys.iter()
                .filter_map(|key| data.get(*key).map(|v| (key.to_string(), v.clone())))
                .collect()
        }
    }
}

/// In-process storage, with switches to simulate a failing backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: StorageMap,
    writes: usize,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: StorageMap) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    pub fn data(&self) -> &StorageMap {
        &self.data
    }

    /// Number of successful `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Storage for MemoryStorage {
    fn get(&self, keys: Option<&[&str]>) -> Result<StorageMap, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("read refused".into()));
        }
        Ok(select(&self.data, keys))
    }

    fn set(&mut self, items: StorageMap) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Unavailable("write refused".into()));
        }
        self.data.extend(items);
        self.writes += 1;
        Ok(())
    }
}

/// Storage kept as a single JSON object in a file. A missing file is empty storage.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<StorageMap, StorageError> {
        let Some(content) = read_optional(&self.path)? else {
            trace!(path = %self.path.display(), "storage file missing, treating as empty");
            return Ok(StorageMap::new());
        };

        if content.trim().is_empty() {
            return Ok(StorageMap::new());
        }

        serde_json::from_str(&content).map_err(|source| {
            StorageError::Corrupted {
                path: self.path.clone(),
                source,
            }
        })
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, keys: Option<&[&str]>) -> Result<StorageMap, StorageError> {
        let data = self.read_all()?;
        Ok(select(&data, keys))
    }

    fn set(&mut self, items: StorageMap) -> Result<(), StorageError> {
        let mut data = self.read_all()?;
        data.extend(items);

        let serialized = serde_json::to_vec_pretty(&data).map_err(|source| {
            StorageError::Corrupted {
                path: self.path.clone(),
                source,
            }
        })?;
        write_atomic(&self.path, &serialized)?;
        trace!(path = %self.path.display(), keys = data.len(), "storage written");
        Ok(())
    }
}
