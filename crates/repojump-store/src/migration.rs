use serde_json::{json, Value};
use tracing::{debug, trace};

use crate::{
    error::{MigrationError, Result},
    models::{RepoEntry, SchemaVersion, SettingsBlob, REPOS_KEY, VERSION_KEY},
    storage::{Storage, StorageMap},
};

/// `1.0 -> 1.1`: `repos` becomes an array and bare URL strings become entries.
fn upgrade_repos_array(mut blob: StorageMap) -> StorageMap {
    let repos = match blob.remove(REPOS_KEY) {
        None | Some(Value::Null) => Value::Array(Vec::new()),
        Some(Value::Array(items)) => {
            Value::Array(
                items
                    .into_iter()
                    .map(|item| {
                        match item {
                            Value::String(url) => json!({ "url": url }),
                            other => other,
                        }
                    })
                    .collect(),
            )
        }
        // Left for the loader to report.
        Some(other) => other,
    };

    blob.insert(REPOS_KEY.to_string(), repos);
    blob
}

/// `1.1 -> 1.2`: trims `url`/`tag`; a `null` or blank `tag` is removed.
fn upgrade_blank_tags(mut blob: StorageMap) -> StorageMap {
    if let Some(Value::Array(items)) = blob.get_mut(REPOS_KEY) {
        for entry in items.iter_mut().filter_map(Value::as_object_mut) {
            if let Some(Value::String(url)) = entry.get_mut("url") {
                *url = url.trim().to_string();
            }

            let drop_tag = match entry.get_mut("tag") {
                Some(Value::Null) => true,
                Some(Value::String(tag)) => {
                    *tag = tag.trim().to_string();
                    tag.is_empty()
                }
                _ => false,
            };
            if drop_tag {
                entry.remove("tag");
            }
        }
    }

    blob
}

fn upgrade_step(from: SchemaVersion, blob: StorageMap) -> StorageMap {
    match from {
        SchemaVersion::V1_0 => upgrade_repos_array(blob),
        SchemaVersion::V1_1 => upgrade_blank_tags(blob),
        SchemaVersion::V1_2 => blob,
    }
}

/// Applies every pending upgrade step to a full stored blob, in version order,
/// and stamps the current version. Keys and fields the steps do not touch are
/// carried over. A blob already at the current version is returned unchanged.
pub fn migrate(mut blob: StorageMap) -> std::result::Result<StorageMap, MigrationError> {
    let mut version = SchemaVersion::detect(blob.get(VERSION_KEY))?;

    while let Some(next) = version.next() {
        trace!(from = %version, to = %next, "applying settings upgrade step");
        blob = upgrade_step(version, blob);
        blob.insert(VERSION_KEY.to_string(), json!(next.as_str()));
        version = next;
    }

    Ok(blob)
}

/// Owns the versioned settings layout on top of a [`Storage`].
pub struct Migrator<S> {
    storage: S,
}

impl<S: Storage> Migrator<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Reads `key` from the settings, upgrading the stored layout first if it
    /// is not current.
    ///
    /// The fast path reads `version` and `key` only and never writes. Otherwise
    /// the whole blob is read, upgraded and written back once before `key` is
    /// returned from it.
    pub fn load(&mut self, key: &str) -> Result<Option<Value>> {
        let mut current = self.storage.get(Some(&[VERSION_KEY, key]))?;
        let version = SchemaVersion::detect(current.get(VERSION_KEY))?;

        if version == SchemaVersion::CURRENT {
            trace!(key = key, "settings already at current version");
            return Ok(current.remove(key));
        }

        let full = self.storage.get(None)?;
        let mut upgraded = migrate(full)?;
        debug!(
            from = %version,
            to = %SchemaVersion::CURRENT,
            "upgrading stored settings"
        );
        self.storage.set(upgraded.clone())?;

        Ok(upgraded.remove(key))
    }

    /// Persists `repos` under the current version.
    pub fn save(&mut self, repos: &[RepoEntry]) -> Result<()> {
        self.save_blob(&SettingsBlob::current(repos.to_vec()))
    }

    /// Persists a whole settings blob, replacing the stored version and repos.
    pub fn save_blob(&mut self, blob: &SettingsBlob) -> Result<()> {
        let mut items = StorageMap::new();
        items.insert(VERSION_KEY.to_string(), json!(SchemaVersion::CURRENT.as_str()));
        items.insert(
            REPOS_KEY.to_string(),
            serde_json::to_value(&blob.repos)?,
        );
        self.storage.set(items)?;
        trace!(repos = blob.repos.len(), "settings saved");
        Ok(())
    }
}
