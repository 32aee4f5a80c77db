use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{Result, StoreError},
    migration::Migrator,
    models::{EnrichedRepo, RepoEntry, SettingsBlob, REPOS_KEY},
    rows::{check_rows, RowInput, RowReport},
    storage::Storage,
    validate::validate,
};

/// Orders repositories by tag, then name. A missing tag sorts first.
///
/// The sort is stable: entries with equal tag and name keep their stored order.
pub fn sort_repos(repos: &mut [EnrichedRepo]) {
    repos.sort_by(|a, b| {
        let tag_a = a.tag.as_deref().unwrap_or_default();
        let tag_b = b.tag.as_deref().unwrap_or_default();
        tag_a.cmp(tag_b).then_with(|| {
            let name_a = a.name.as_deref().unwrap_or_default();
            let name_b = b.name.as_deref().unwrap_or_default();
            name_a.cmp(name_b)
        })
    });
}

/// Loads and saves the user's repository list.
pub struct RepositoryStore<S> {
    migrator: Migrator<S>,
}

impl<S: Storage> RepositoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            migrator: Migrator::new(storage),
        }
    }

    pub fn storage(&self) -> &S {
        self.migrator.storage()
    }

    fn load_entries(&mut self) -> Result<Vec<RepoEntry>> {
        match self.migrator.load(REPOS_KEY)? {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value).map_err(StoreError::MalformedRepos),
        }
    }

    /// Loads every stored repository, resolved and sorted for display.
    ///
    /// Entries whose host or name cannot be resolved are kept with `None`
    /// host/name.
    pub fn load_all(&mut self) -> Result<Vec<EnrichedRepo>> {
        let mut repos: Vec<EnrichedRepo> = self
            .load_entries()?
            .into_iter()
            .map(EnrichedRepo::from_entry)
            .collect();

        for repo in repos.iter().filter(|repo| !repo.is_resolvable()) {
            warn!(url = %repo.url, "stored repository cannot be resolved");
        }

        sort_repos(&mut repos);
        debug!(count = repos.len(), "loaded repositories");
        Ok(repos)
    }

    /// Persists `repos` without their derived fields. Unresolvable entries are
    /// written as they are.
    pub fn save_all(&mut self, repos: &[EnrichedRepo]) -> Result<()> {
        let entries: Vec<RepoEntry> = repos.iter().map(EnrichedRepo::to_entry).collect();
        self.migrator.save(&entries)?;
        debug!(count = entries.len(), "saved repositories");
        Ok(())
    }

    /// Replaces the list with the valid rows of an editor and reports the
    /// rows it had to leave out.
    pub fn save_rows(&mut self, rows: &[RowInput]) -> Result<RowReport> {
        let report = check_rows(rows);
        self.migrator.save(&report.accepted)?;
        debug!(
            saved = report.accepted.len(),
            rejected = report.rejected.len(),
            "saved edited rows"
        );
        Ok(report)
    }

    /// Replaces the whole settings with an exported payload.
    ///
    /// The payload is parsed and validated before anything is written; on any
    /// failure the stored settings are left untouched. Returns the number of
    /// imported repositories.
    pub fn import_and_replace(&mut self, raw: &str) -> Result<usize> {
        let value: Value = serde_json::from_str(raw)?;
        let blob = validate(&value)?;
        self.migrator.save_blob(&blob)?;
        debug!(count = blob.repos.len(), "imported settings");
        Ok(blob.repos.len())
    }

    /// The full current settings, as written by an export.
    pub fn export(&mut self) -> Result<SettingsBlob> {
        Ok(SettingsBlob::current(self.load_entries()?))
    }
}
