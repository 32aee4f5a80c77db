use miette::Diagnostic;
use repojump_config::error::{ConfigError, UrlError};
use repojump_store::{error::StorageError, StoreError};
use repojump_utils::error::PathError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum RepojumpError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    InvalidUrl(#[from] UrlError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(StoreError),

    /// Backend failures are reported generically; the cause stays attached as the source.
    #[error("Unexpected error while accessing the settings storage")]
    #[diagnostic(
        code(repojump::storage),
        help("Run with -v for details, or check the storage file configured in config.toml")
    )]
    Storage(#[source] StorageError),

    #[error("Repository list unavailable: {0}")]
    #[diagnostic(code(repojump::unavailable))]
    CatalogUnavailable(String),

    #[error("No repository matches `{0}`")]
    #[diagnostic(
        code(repojump::no_match),
        help("Run `repojump list` to see the saved repositories")
    )]
    NoMatch(String),

    #[error("Error while {action}")]
    #[diagnostic(code(repojump::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(repojump::json))]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for RepojumpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Storage(err) => RepojumpError::Storage(err),
            other => RepojumpError::Store(other),
        }
    }
}

pub type RepojumpResult<T> = std::result::Result<T, RepojumpError>;

pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> RepojumpResult<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> RepojumpResult<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            RepojumpError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
