//! Error types for validation, storage, the registry and the session.

use thiserror::Error;

/// Form-level checks run before a draft or edit is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("artwork title is required")]
    MissingTitle,
    #[error("artist name is required")]
    MissingArtist,
    #[error("price must be a non-negative number")]
    InvalidPrice,
    #[error("{0} must be a non-negative number")]
    InvalidDimension(&'static str),
}

/// Failures of a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("LMDB error: {0}")]
    Lmdb(#[from] lmdb::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("corrupt entry: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("no artwork with id {0}")]
    NotFound(u64),
    #[error("no artwork ids left to assign")]
    IdsExhausted,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("no form is open")]
    NoOpenForm,
    #[error("no artwork with id {0}")]
    NotFound(u64),
}
