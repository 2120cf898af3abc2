use crate::entities::{EntityId, Order};
use crate::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Writes the order and its line items as one unit.
    async fn save(&self, order: &Order) -> Result<Order, DomainError>;
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Order>, DomainError>;
    async fn find_by_user(&self, user: &EntityId) -> Result<Vec<Order>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Order>, DomainError>;
    /// Persists the status and `updated_at` of an existing order.
    async fn update(&self, order: &Order) -> Result<Order, DomainError>;
}
