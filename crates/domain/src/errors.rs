use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Security error: {0}")]
    SecurityError(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::InvalidRequest(_) => "INVALID_REQUEST",
            DomainError::InvalidIdentifier(_) => "INVALID_IDENTIFIER",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Conflict(_) => "CONFLICT",
            DomainError::InvalidCredentials => "INVALID_CREDENTIALS",
            DomainError::PersistenceError(_) => "PERSISTENCE_ERROR",
            DomainError::SecurityError(_) => "INTERNAL_ERROR",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
