//! Versioned persistence of the user's repository list.
//!
//! Settings live in a key-value [`storage::Storage`] under the keys `version`
//! and `repos`. Reads go through the [`migration::Migrator`], which upgrades
//! older layouts in place; imports go through [`validate::validate`] first.

pub mod error;
pub mod migration;
pub mod models;
pub mod repository;
pub mod rows;
pub mod storage;
pub mod validate;

pub use error::{Result, StoreError};
pub use models::{EnrichedRepo, RepoEntry, SchemaVersion, SettingsBlob};
pub use repository::RepositoryStore;
