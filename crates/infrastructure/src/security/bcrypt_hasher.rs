use async_trait::async_trait;
use domain::{DomainError, PasswordHasher};

/// bcrypt with a configurable work factor. Hashing is CPU bound, so both
/// directions run on the blocking pool.
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_string();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::SecurityError(e.to_string()))?
            .map_err(|e| DomainError::SecurityError(format!("password hashing failed: {}", e)))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| DomainError::SecurityError(e.to_string()))?
            .map_err(|e| DomainError::SecurityError(format!("password verification failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn verifies_only_the_hashed_password() {
        let hasher = BcryptPasswordHasher::new(4);
        let hash = hasher.hash("hunter22").await.unwrap();

        assert_ne!(hash, "hunter22");
        assert!(hash.starts_with("$2"));
        assert!(hasher.verify("hunter22", &hash).await.unwrap());
        assert!(!hasher.verify("hunter23", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_a_security_error() {
        let hasher = BcryptPasswordHasher::new(4);
        let result = hasher.verify("anything", "not-a-bcrypt-hash").await;
        assert!(matches!(result, Err(DomainError::SecurityError(_))));
    }
}
