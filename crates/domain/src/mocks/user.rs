use super::poisoned;
use crate::entities::{EntityId, User};
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl MockUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|users| users.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<User>, DomainError> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users
            .iter()
            .filter(|user| user.id.map_or(false, |id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().map_err(poisoned)?;
        Ok(users
            .iter()
            .find(|user| user.username.as_deref() == Some(username))
            .cloned())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut users = self.users.lock().map_err(poisoned)?;

        if users.iter().any(|existing| existing.email == user.email) {
            return Err(DomainError::Conflict(format!("email {} is already registered", user.email)));
        }
        if let Some(username) = &user.username {
            if users.iter().any(|existing| existing.username.as_ref() == Some(username)) {
                return Err(DomainError::Conflict(format!("username {} is taken", username)));
            }
        }

        let mut saved = user.clone();
        saved.id = Some(saved.id.unwrap_or_else(EntityId::generate));
        users.push(saved.clone());
        Ok(saved)
    }
}
