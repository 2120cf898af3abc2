use super::EntityId;
use crate::errors::DomainError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    pub description: String,
}

impl Category {
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: None,
            name: name.trim().to_string(),
            description,
        }
    }

    pub fn with_id(id: EntityId, name: String, description: String) -> Self {
        Self {
            id: Some(id),
            name,
            description,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::InvalidRequest("Category name cannot be empty".to_string()));
        }
        Ok(())
    }
}
