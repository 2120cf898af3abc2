use chrono::Utc;
use domain::{DomainError, TokenIssuer, User};
use jsonwebtoken::{EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Claims carried by every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 session tokens signed with a shared secret.
pub struct JwtTokenIssuer {
    key: EncodingKey,
    ttl: Duration,
}

impl JwtTokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User) -> Result<String, DomainError> {
        let id = user
            .id
            .ok_or_else(|| DomainError::SecurityError("cannot issue a token for an unsaved user".to_string()))?;

        let issued_at = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| DomainError::SecurityError("token lifetime is out of range".to_string()))?;

        let claims = Claims {
            sub: id.to_string(),
            email: user.email.clone(),
            role: user.role.as_str().to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.key)
            .map_err(|e| DomainError::SecurityError(format!("token signing failed: {}", e)))
    }
}
