use std::fmt;

use repojump_config::host::{match_host, HostId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::MigrationError;

pub const VERSION_KEY: &str = "version";
pub const REPOS_KEY: &str = "repos";

/// Tags of the persisted settings layout, in upgrade order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaVersion {
    /// No `version` key; `repos` written by the first releases.
    V1_0,
    V1_1,
    V1_2,
}

impl SchemaVersion {
    pub const CURRENT: SchemaVersion = SchemaVersion::V1_2;

    pub const ALL: [SchemaVersion; 3] =
        [SchemaVersion::V1_0, SchemaVersion::V1_1, SchemaVersion::V1_2];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVersion::V1_0 => "1.0",
            SchemaVersion::V1_1 => "1.1",
            SchemaVersion::V1_2 => "1.2",
        }
    }

    pub fn next(self) -> Option<SchemaVersion> {
        match self {
            SchemaVersion::V1_0 => Some(SchemaVersion::V1_1),
            SchemaVersion::V1_1 => Some(SchemaVersion::V1_2),
            SchemaVersion::V1_2 => None,
        }
    }

    /// Reads the version stamped on a stored blob. A missing (or `null`)
    /// stamp is the oldest layout.
    pub fn detect(stamp: Option<&Value>) -> Result<SchemaVersion, MigrationError> {
        match stamp {
            None | Some(Value::Null) => Ok(SchemaVersion::V1_0),
            Some(Value::String(tag)) => {
                Self::ALL
                    .into_iter()
                    .find(|version| version.as_str() == tag)
                    .ok_or_else(|| MigrationError::UnknownVersion(tag.clone()))
            }
            Some(other) => Err(MigrationError::UnknownVersion(other.to_string())),
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repository as persisted. Fields this release does not know are kept in
/// `extra` and written back untouched.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RepoEntry {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RepoEntry {
    pub fn new(url: impl Into<String>, tag: Option<String>) -> Self {
        Self {
            url: url.into(),
            tag,
            extra: Map::new(),
        }
    }
}

/// Import/export payload and the persisted shape of the whole settings.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SettingsBlob {
    pub version: String,

    #[serde(default)]
    pub repos: Vec<RepoEntry>,
}

impl SettingsBlob {
    pub fn current(repos: Vec<RepoEntry>) -> Self {
        Self {
            version: SchemaVersion::CURRENT.as_str().to_string(),
            repos,
        }
    }
}

/// A repository augmented with its resolved host and canonical name.
///
/// `host`/`name` are recomputed from the stored URL on every load and never
/// persisted; `None` marks an entry that cannot be navigated to. `url` is the
/// display form with one trailing `/` removed, while the stored URL is
/// written back unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedRepo {
    pub url: String,
    stored_url: String,
    pub tag: Option<String>,
    pub host: Option<HostId>,
    pub name: Option<String>,
    pub extra: Map<String, Value>,
}

impl EnrichedRepo {
    pub fn from_entry(entry: RepoEntry) -> Self {
        let profile = match_host(&entry.url);
        let name = profile.and_then(|p| p.extract_name(&entry.url));
        let url = entry
            .url
            .strip_suffix('/')
            .unwrap_or(&entry.url)
            .to_string();

        Self {
            url,
            stored_url: entry.url,
            tag: entry.tag,
            host: profile.map(|p| p.id),
            name,
            extra: entry.extra,
        }
    }

    pub fn to_entry(&self) -> RepoEntry {
        RepoEntry {
            url: self.stored_url.clone(),
            tag: self.tag.clone(),
            extra: self.extra.clone(),
        }
    }

    pub fn is_resolvable(&self) -> bool {
        self.host.is_some() && self.name.is_some()
    }

    /// Labels the repository can be searched by besides its name.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.tag.as_deref().into_iter().filter(|tag| !tag.is_empty())
    }
}
