use super::poisoned;
use crate::entities::{Category, EntityId, Money, Product, ProductFilter};
use crate::errors::DomainError;
use crate::repositories::{CategoryRepository, ProductRepository};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default)]
pub struct MockCategoryRepository {
    categories: Arc<Mutex<Vec<Category>>>,
}

impl MockCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for MockCategoryRepository {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Category>, DomainError> {
        let categories = self.categories.lock().map_err(poisoned)?;
        Ok(categories
            .iter()
            .find(|category| category.id.as_ref() == Some(id))
            .cloned())
    }

    async fn save(&self, category: &Category) -> Result<Category, DomainError> {
        let mut saved = category.clone();
        saved.id = Some(saved.id.unwrap_or_else(EntityId::generate));
        self.categories.lock().map_err(poisoned)?.push(saved.clone());
        Ok(saved)
    }

    async fn find_all(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.lock().map_err(poisoned)?.clone())
    }
}

/// Product store that counts batch lookups.
#[derive(Debug, Clone, Default)]
pub struct MockProductRepository {
    products: Arc<Mutex<Vec<Product>>>,
    lookups: Arc<AtomicUsize>,
}

impl MockProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find_by_ids` calls served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn set_price(&self, id: &EntityId, price: Money) -> Result<(), DomainError> {
        let mut products = self.products.lock().map_err(poisoned)?;
        let product = products
            .iter_mut()
            .find(|product| product.id.as_ref() == Some(id))
            .ok_or_else(|| DomainError::not_found("Product", id.to_string()))?;
        product.price = price;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for MockProductRepository {
    async fn find_by_ids(&self, ids: &[EntityId]) -> Result<Vec<Product>, DomainError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let products = self.products.lock().map_err(poisoned)?;
        Ok(products
            .iter()
            .filter(|product| product.id.map_or(false, |id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn save(&self, product: &Product) -> Result<Product, DomainError> {
        let mut saved = product.clone();
        saved.id = Some(saved.id.unwrap_or_else(EntityId::generate));
        self.products.lock().map_err(poisoned)?.push(saved.clone());
        Ok(saved)
    }

    async fn find(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        let products = self.products.lock().map_err(poisoned)?;
        Ok(products
            .iter()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect())
    }
}
