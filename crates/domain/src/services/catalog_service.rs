use crate::entities::{Category, EntityId, Money, Product, ProductFilter};
use crate::errors::DomainError;
use crate::repositories::{CategoryRepository, ProductRepository};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewProduct {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i64>,
}

/// Raw product query as it arrives from the query string.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub search: Option<String>,
}

impl ProductQuery {
    /// Blank parameters are treated as absent.
    pub fn into_filter(self) -> Result<ProductFilter, DomainError> {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|value| !value.trim().is_empty())
        }

        let category = present(self.category)
            .map(|raw| EntityId::parse(raw.trim()))
            .transpose()?;
        let min_price = present(self.min_price)
            .map(|raw| raw.parse::<Money>())
            .transpose()?;
        let max_price = present(self.max_price)
            .map(|raw| raw.parse::<Money>())
            .transpose()?;

        Ok(ProductFilter::new(category, min_price, max_price, self.search))
    }
}

/// Categories and products.
pub struct CatalogService {
    category_repository: Arc<dyn CategoryRepository>,
    product_repository: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(
        category_repository: Arc<dyn CategoryRepository>,
        product_repository: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            category_repository,
            product_repository,
        }
    }

    pub async fn create_category(&self, request: NewCategory) -> Result<Category, DomainError> {
        let name = request
            .name
            .ok_or_else(|| DomainError::InvalidRequest("name is required".to_string()))?;
        let category = Category::new(name, request.description.unwrap_or_default());
        category.validate()?;

        let saved = self.category_repository.save(&category).await?;
        info!(category_id = ?saved.id, name = %saved.name, "category created");
        Ok(saved)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, DomainError> {
        self.category_repository.find_all().await
    }

    /// The category must already exist; an unknown category is a bad
    /// request rather than a missing resource.
    pub async fn create_product(&self, request: NewProduct) -> Result<Product, DomainError> {
        let (name, price, raw_category) = match (request.name, request.price, request.category) {
            (Some(name), Some(price), Some(category)) => (name, price, category),
            _ => {
                return Err(DomainError::InvalidRequest(
                    "name, price and category are required".to_string(),
                ))
            }
        };

        let category = EntityId::parse(raw_category.trim())?;
        if self.category_repository.find_by_id(&category).await?.is_none() {
            return Err(DomainError::InvalidRequest(format!(
                "category {} does not exist",
                category
            )));
        }

        let stock = i32::try_from(request.stock.unwrap_or(0))
            .map_err(|_| DomainError::InvalidRequest("stock is out of range".to_string()))?;
        let product = Product::new(
            name,
            price,
            request.description.unwrap_or_default(),
            category,
            stock,
        );
        product.validate()?;

        let saved = self.product_repository.save(&product).await?;
        info!(product_id = ?saved.id, name = %saved.name, price = %saved.price, "product created");
        Ok(saved)
    }

    pub async fn find_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, DomainError> {
        self.product_repository.find(filter).await
    }
}
