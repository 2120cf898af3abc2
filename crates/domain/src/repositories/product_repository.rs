use crate::entities::{EntityId, Product, ProductFilter};
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Batch lookup; ids that do not resolve are simply absent from the result.
    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Product>, DomainError>;
    async fn save(&self, product: &Product) -> Result<Product, DomainError>;
    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError>;
}
