use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeError;

use crate::registry_error::{RegistryError, SessionError, StoreError, ValidationError};

/// Envelope returned as JSON from every FFI call.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum AppResponse {
    DatabaseError(String),
    SerializationError(String),
    NotFound(String),
    ValidationError(String),
    BadRequest(String),
    Ok(String),
}

impl Display for AppResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AppResponse::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppResponse::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppResponse::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppResponse::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppResponse::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppResponse::Ok(msg) => write!(f, "Ok: {}", msg),
        }
    }
}

impl From<StoreError> for AppResponse {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Serialization(e) => AppResponse::from(e),
            StoreError::Corrupt(msg) => AppResponse::DatabaseError(format!("Store is corrupted: {}", msg)),
            other => AppResponse::DatabaseError(other.to_string()),
        }
    }
}

impl From<RegistryError> for AppResponse {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Store(e) => AppResponse::from(e),
            RegistryError::NotFound(id) => AppResponse::NotFound(format!("No artwork found with id: {id}")),
            RegistryError::IdsExhausted => AppResponse::DatabaseError("No artwork ids left to assign".to_string()),
        }
    }
}

impl From<ValidationError> for AppResponse {
    fn from(err: ValidationError) -> Self {
        AppResponse::ValidationError(err.to_string())
    }
}

impl From<SessionError> for AppResponse {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(e) => AppResponse::from(e),
            SessionError::Registry(e) => AppResponse::from(e),
            SessionError::NoOpenForm => AppResponse::BadRequest("No form is open".to_string()),
            SessionError::NotFound(id) => AppResponse::NotFound(format!("No artwork found with id: {id}")),
        }
    }
}

impl From<SerdeError> for AppResponse {
    fn from(err: SerdeError) -> Self {
        AppResponse::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl AppResponse {
    pub fn success(msg: impl Into<String>) -> Self {
        AppResponse::Ok(msg.into())
    }

    /// Serializes `value` into an `Ok` payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(json) => AppResponse::Ok(json),
            Err(e) => AppResponse::from(e),
        }
    }
}
