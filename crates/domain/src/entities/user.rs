use super::EntityId;
use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            other => Err(DomainError::InvalidRequest(format!("unknown role: {}", other))),
        }
    }
}

/// Core User entity - represents the business domain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>, // None for new users before persistence
    pub username: Option<String>,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: Option<String>, email: String, password_hash: String, role: Role) -> Self {
        Self {
            id: None,
            username: username.map(|name| name.trim().to_string()),
            email: email.trim().to_string(),
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(
        id: EntityId,
        username: Option<String>,
        email: String,
        password_hash: String,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Some(id),
            username,
            email,
            password_hash,
            role,
            created_at,
        }
    }

    pub fn validate(&self) -> Result<(), crate::DomainError> {
        if let Some(username) = &self.username {
            if username.is_empty() {
                return Err(DomainError::InvalidRequest("Username cannot be empty".to_string()));
            }
        }

        if self.email.is_empty() {
            return Err(DomainError::InvalidRequest("Email cannot be empty".to_string()));
        }

        if !self.email.contains('@') {
            return Err(DomainError::InvalidRequest("Invalid email format".to_string()));
        }

        Ok(())
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

/// The slice of a user shown next to an order in admin listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub username: Option<String>,
    pub email: String,
}
