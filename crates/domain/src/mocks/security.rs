use crate::entities::User;
use crate::errors::DomainError;
use crate::security::{PasswordHasher, TokenIssuer};
use async_trait::async_trait;

/// Reversible stand-in for a real password hash; fast enough for unit tests.
#[derive(Debug, Clone, Default)]
pub struct MockPasswordHasher;

impl MockPasswordHasher {
    const PREFIX: &'static str = "hashed:";
}

#[async_trait]
impl PasswordHasher for MockPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        Ok(format!("{}{}", Self::PREFIX, password))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        Ok(hash.strip_prefix(Self::PREFIX) == Some(password))
    }
}

/// Issues `token-for:<user id>` strings.
#[derive(Debug, Clone, Default)]
pub struct MockTokenIssuer;

impl TokenIssuer for MockTokenIssuer {
    fn issue(&self, user: &User) -> Result<String, DomainError> {
        let id = user
            .id
            .ok_or_else(|| DomainError::SecurityError("cannot issue a token for an unsaved user".to_string()))?;
        Ok(format!("token-for:{}", id))
    }
}
