use crate::entities::User;
use crate::errors::DomainError;
use async_trait::async_trait;

/// Password hashing capability consumed by the identity service.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, DomainError>;
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}

/// Issues bearer tokens for authenticated users.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> Result<String, DomainError>;
}
