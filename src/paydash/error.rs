use crate::form::ValidationErrors;
use crate::model::CustomerId;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Customer not found: {0}")]
    NotFound(CustomerId),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),

    /// A failure handed to every reader that joined the same in-flight fetch.
    #[error("{0}")]
    Shared(Arc<DashError>),
}

impl DashError {
    /// Recovers the owned error when no other reader still holds it.
    pub fn unshare(error: Arc<DashError>) -> Self {
        Arc::try_unwrap(error).unwrap_or_else(DashError::Shared)
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            DashError::NotFound(_) => true,
            DashError::Shared(inner) => inner.is_not_found(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;
