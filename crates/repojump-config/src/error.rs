use miette::Diagnostic;
use repojump_utils::error::{FileSystemError, PathError};
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(repojump_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(repojump_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(repojump_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("Invalid link mode: {0}")]
    #[diagnostic(
        code(repojump_config::invalid_link_mode),
        help("Use one of: pr, log, src, c-pr (or their hotkeys p, l, s, c)")
    )]
    InvalidLinkMode(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(repojump_config::io))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    FileSystem(#[from] FileSystemError),
}

/// Reasons a repository URL cannot be used for navigation.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("URL is empty")]
    #[diagnostic(code(repojump_config::empty_url))]
    Empty,

    #[error("Unsupported host in `{0}`")]
    #[diagnostic(
        code(repojump_config::unknown_host),
        help("Supported hosts are bitbucket.org and github.com")
    )]
    UnknownHost(String),

    #[error("Cannot extract a repository name from `{url}`")]
    #[diagnostic(
        code(repojump_config::name_mismatch),
        help("Use the full repository URL, e.g. https://github.com/<owner>/<repo>")
    )]
    NameMismatch { url: String, domain: &'static str },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
