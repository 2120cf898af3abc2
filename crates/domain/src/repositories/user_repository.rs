use crate::entities::{EntityId, User};
use crate::errors::DomainError;
use async_trait::async_trait;

/// Repository trait - defines what we need from persistence layer
/// This is a PORT in hexagonal architecture
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;
    /// Persists a new user; a duplicate email or username is a `Conflict`.
    async fn save(&self, user: &User) -> Result<User, DomainError>;
}
