use crate::entities::{Category, EntityId};
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Category>, DomainError>;
    async fn save(&self, category: &Category) -> Result<Category, DomainError>;
    async fn find_all(&self) -> Result<Vec<Category>, DomainError>;
}
