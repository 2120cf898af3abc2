use super::poisoned;
use crate::entities::{EntityId, Order};
use crate::errors::DomainError;
use crate::repositories::OrderRepository;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Order store that counts writes and can be told to fail them.
#[derive(Debug, Clone, Default)]
pub struct MockOrderRepository {
    orders: Arc<Mutex<Vec<Order>>>,
    writes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl MockOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful `save` / `update` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.orders.lock().map(|orders| orders.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::PersistenceError("order store unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn save(&self, order: &Order) -> Result<Order, DomainError> {
        self.check_writable()?;
        let mut saved = order.clone();
        saved.id = Some(saved.id.unwrap_or_else(EntityId::generate));
        self.orders.lock().map_err(poisoned)?.push(saved.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(saved)
    }

    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Order>, DomainError> {
        let orders = self.orders.lock().map_err(poisoned)?;
        Ok(orders.iter().find(|order| order.id.as_ref() == Some(id)).cloned())
    }

    async fn find_by_user(&self, user: &EntityId) -> Result<Vec<Order>, DomainError> {
        let orders = self.orders.lock().map_err(poisoned)?;
        Ok(orders.iter().filter(|order| &order.user == user).cloned().collect())
    }

    async fn find_all(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.orders.lock().map_err(poisoned)?.clone())
    }

    async fn update(&self, order: &Order) -> Result<Order, DomainError> {
        self.check_writable()?;
        let mut orders = self.orders.lock().map_err(poisoned)?;
        let stored = orders
            .iter_mut()
            .find(|stored| stored.id.is_some() && stored.id == order.id)
            .ok_or_else(|| {
                DomainError::not_found(
                    "Order",
                    order.id.map(|id| id.to_string()).unwrap_or_default(),
                )
            })?;
        stored.status = order.status;
        stored.updated_at = order.updated_at;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(stored.clone())
    }
}
