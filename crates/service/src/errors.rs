use thiserror::Error;

use models::errors::ModelError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    /// Caller supplied bad input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Model(ModelError::Validation(_)))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Human-readable reason without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(m) | Self::NotFound(m) | Self::Db(m) => m.clone(),
            Self::Model(ModelError::Validation(m)) | Self::Model(ModelError::Db(m)) => m.clone(),
        }
    }
}
