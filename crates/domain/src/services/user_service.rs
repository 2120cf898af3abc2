use crate::entities::{Role, User};
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use crate::security::{PasswordHasher, TokenIssuer};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A user together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

/// User Service - registration and login
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
}

impl UserService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_issuer,
        }
    }

    /// Create a new user with business validation
    pub async fn register(&self, request: Registration) -> Result<AuthenticatedUser, DomainError> {
        let (email, password) = match (request.email, request.password) {
            (Some(email), Some(password)) if !password.is_empty() => (email, password),
            _ => {
                return Err(DomainError::InvalidRequest(
                    "email and password are required".to_string(),
                ))
            }
        };

        let mut user = User::new(
            request.username,
            email,
            String::new(),
            request.role.unwrap_or_default(),
        );

        // Business validation
        user.validate()?;

        // Check if email already exists
        if self.user_repository.find_by_email(&user.email).await?.is_some() {
            warn!(email = %user.email, "registration rejected: email already registered");
            return Err(DomainError::Conflict(format!(
                "email {} is already registered",
                user.email
            )));
        }

        // Check if username already exists
        if let Some(username) = &user.username {
            if self.user_repository.find_by_username(username).await?.is_some() {
                return Err(DomainError::Conflict(format!("username {} is taken", username)));
            }
        }

        user.password_hash = self.password_hasher.hash(&password).await?;
        let saved = self.user_repository.save(&user).await?;
        let token = self.token_issuer.issue(&saved)?;

        info!(user_id = ?saved.id, role = saved.role.as_str(), "user registered");
        Ok(AuthenticatedUser { user: saved, token })
    }

    pub async fn login(&self, credentials: Credentials) -> Result<AuthenticatedUser, DomainError> {
        let (email, password) = match (credentials.email, credentials.password) {
            (Some(email), Some(password)) => (email, password),
            _ => {
                return Err(DomainError::InvalidRequest(
                    "email and password are required".to_string(),
                ))
            }
        };
        let email = email.trim();

        let user = self
            .user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("User", email))?;

        if !self.password_hasher.verify(&password, &user.password_hash).await? {
            warn!(user_id = ?user.id, "login rejected: wrong password");
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.token_issuer.issue(&user)?;
        info!(user_id = ?user.id, "user logged in");
        Ok(AuthenticatedUser { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockPasswordHasher, MockTokenIssuer, MockUserRepository};

    fn service(users: &MockUserRepository) -> UserService {
        UserService::new(
            Arc::new(users.clone()),
            Arc::new(MockPasswordHasher),
            Arc::new(MockTokenIssuer),
        )
    }

    fn registration(username: Option<&str>, email: &str) -> Registration {
        Registration {
            username: username.map(str::to_string),
            email: Some(email.to_string()),
            password: Some("correct horse".to_string()),
            role: None,
        }
    }

    #[tokio::test]
    async fn registration_hashes_the_password_and_issues_a_token() {
        let users = MockUserRepository::new();
        let registered = service(&users)
            .register(registration(Some("ada"), "ada@example.com"))
            .await
            .unwrap();

        let id = registered.user.id.unwrap();
        assert_eq!(registered.token, format!("token-for:{}", id));
        assert_eq!(registered.user.role, Role::Customer);
        assert_ne!(registered.user.password_hash, "correct horse");
    }

    #[tokio::test]
    async fn username_is_optional() {
        let users = MockUserRepository::new();
        let registered = service(&users)
            .register(registration(None, "anon@example.com"))
            .await
            .unwrap();
        assert_eq!(registered.user.username, None);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_and_keeps_the_first_user() {
        let users = MockUserRepository::new();
        let service = service(&users);
        let first = service
            .register(registration(Some("ada"), "ada@example.com"))
            .await
            .unwrap();

        let second = service
            .register(registration(Some("imposter"), "ada@example.com"))
            .await;

        assert!(matches!(second, Err(DomainError::Conflict(_))));
        assert_eq!(users.len(), 1);
        let stored = users.find_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(stored.username.as_deref(), Some("ada"));
        assert_eq!(stored.id, first.user.id);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let users = MockUserRepository::new();
        let service = service(&users);
        service
            .register(registration(Some("ada"), "ada@example.com"))
            .await
            .unwrap();

        let result = service.register(registration(Some("ada"), "other@example.com")).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn registration_requires_email_and_password() {
        let users = MockUserRepository::new();
        let service = service(&users);

        let no_password = service
            .register(Registration {
                password: None,
                ..registration(None, "a@example.com")
            })
            .await;
        assert!(matches!(no_password, Err(DomainError::InvalidRequest(_))));

        let bad_email = service.register(registration(None, "not-an-email")).await;
        assert!(matches!(bad_email, Err(DomainError::InvalidRequest(_))));
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn login_checks_the_password() {
        let users = MockUserRepository::new();
        let service = service(&users);
        service
            .register(registration(Some("ada"), "ada@example.com"))
            .await
            .unwrap();

        let ok = service
            .login(Credentials {
                email: Some("ada@example.com".to_string()),
                password: Some("correct horse".to_string()),
            })
            .await
            .unwrap();
        assert!(ok.token.starts_with("token-for:"));

        let wrong = service
            .login(Credentials {
                email: Some("ada@example.com".to_string()),
                password: Some("battery staple".to_string()),
            })
            .await;
        assert_eq!(wrong.map(|session| session.token), Err(DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_for_unknown_email_is_not_found() {
        let users = MockUserRepository::new();
        let result = service(&users)
            .login(Credentials {
                email: Some("ghost@example.com".to_string()),
                password: Some("pw".to_string()),
            })
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { entity: "User", .. })));
    }
}
