use std::path::PathBuf;

use miette::Diagnostic;
use repojump_utils::error::FileSystemError;
use thiserror::Error;

/// Failure of the durable key-value backend. Never retried, never partially applied.
#[derive(Error, Diagnostic, Debug)]
pub enum StorageError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    FileSystem(#[from] FileSystemError),

    #[error("Storage file `{path}` is not a JSON object: {source}")]
    #[diagnostic(
        code(repojump_store::corrupted_storage),
        help("Restore the file from an export or remove it to start over")
    )]
    Corrupted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage backend unavailable: {0}")]
    #[diagnostic(code(repojump_store::unavailable))]
    Unavailable(String),
}

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum MigrationError {
    #[error("Unknown settings version `{0}`")]
    #[diagnostic(
        code(repojump_store::unknown_version),
        help("The settings were written by a newer release; upgrade repojump")
    )]
    UnknownVersion(String),
}

/// Reasons an externally supplied settings object is rejected.
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Settings must be a JSON object")]
    #[diagnostic(code(repojump_store::not_an_object))]
    NotAnObject,

    #[error("Unsupported settings version {found:?}, expected `{expected}`")]
    #[diagnostic(
        code(repojump_store::version_mismatch),
        help("Export the settings again from an up-to-date installation")
    )]
    VersionMismatch {
        found: Option<String>,
        expected: &'static str,
    },

    #[error("`repos` must be an array")]
    #[diagnostic(code(repojump_store::repos_not_array))]
    ReposNotArray,

    #[error("Repository #{index} must be an object")]
    #[diagnostic(code(repojump_store::entry_not_object))]
    EntryNotObject { index: usize },

    #[error("Repository #{index} has no url")]
    #[diagnostic(
        code(repojump_store::missing_url),
        help("Every repository needs a non-empty `url` string")
    )]
    MissingUrl { index: usize },

    #[error("Repository #{index} has a tag that is not a string")]
    #[diagnostic(code(repojump_store::invalid_tag))]
    TagNotString { index: usize },
}

#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Migration(#[from] MigrationError),

    #[error("Failed to parse settings: {0}")]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to parse settings: {0}")]
    #[diagnostic(
        code(repojump_store::invalid_json),
        help("The file must contain a settings export in JSON format")
    )]
    InvalidJson(#[from] serde_json::Error),

    #[error("Stored repositories are malformed: {0}")]
    #[diagnostic(
        code(repojump_store::malformed_repos),
        help("Export and re-import the settings, or edit the storage file")
    )]
    MalformedRepos(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
