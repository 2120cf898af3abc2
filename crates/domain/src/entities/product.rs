use super::{EntityId, Money};
use crate::errors::DomainError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    pub price: Money,
    pub description: String,
    pub category: EntityId,
    pub stock: i32,
}

impl Product {
    pub fn new(
        name: String,
        price: Money,
        description: String,
        category: EntityId,
        stock: i32,
    ) -> Self {
        Self {
            id: None,
            name: name.trim().to_string(),
            price,
            description,
            category,
            stock,
        }
    }

    pub fn with_id(
        id: EntityId,
        name: String,
        price: Money,
        description: String,
        category: EntityId,
        stock: i32,
    ) -> Self {
        Self {
            id: Some(id),
            name,
            price,
            description,
            category,
            stock,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::InvalidRequest("Product name cannot be empty".to_string()));
        }
        if self.stock < 0 {
            return Err(DomainError::InvalidRequest("Stock cannot be negative".to_string()));
        }
        Ok(())
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            name: self.name.clone(),
            price: self.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub name: String,
    pub price: Money,
}

/// Optional product query constraints; every supplied constraint must hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub category: Option<EntityId>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    search: Option<String>,
}

impl ProductFilter {
    pub fn new(
        category: Option<EntityId>,
        min_price: Option<Money>,
        max_price: Option<Money>,
        search: Option<String>,
    ) -> Self {
        Self {
            category,
            min_price,
            max_price,
            search: search
                .filter(|text| !text.trim().is_empty())
                .map(|text| text.to_lowercase()),
        }
    }

    /// Lowercased search text, otherwise as given; blank searches are dropped.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.category.map_or(true, |category| product.category == category)
            && self.min_price.map_or(true, |min| product.price >= min)
            && self.max_price.map_or(true, |max| product.price <= max)
            && self.matches_text(product)
    }

    /// Case-insensitive substring match against name OR description.
    pub fn matches_text(&self, product: &Product) -> bool {
        match &self.search {
            None => true,
            Some(needle) => {
                product.name.to_lowercase().contains(needle.as_str())
                    || product.description.to_lowercase().contains(needle.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, description: &str, cents: i64, category: EntityId) -> Product {
        Product::with_id(
            EntityId::generate(),
            name.to_string(),
            Money::from_cents(cents).unwrap(),
            description.to_string(),
            category,
            5,
        )
    }

    #[test]
    fn price_band_and_search_are_and_combined() {
        let category = EntityId::generate();
        let filter = ProductFilter::new(
            None,
            Some(Money::from_cents(1000).unwrap()),
            Some(Money::from_cents(5000).unwrap()),
            Some("shirt".to_string()),
        );

        assert!(filter.matches(&product("Blue SHIRT", "cotton", 1000, category)));
        assert!(filter.matches(&product("Polo", "a t-shirt for summer", 5000, category)));
        assert!(!filter.matches(&product("Silk shirt", "fancy", 9900, category)));
        assert!(!filter.matches(&product("Socks", "wool", 2000, category)));
    }

    #[test]
    fn bounds_may_be_supplied_alone() {
        let category = EntityId::generate();
        let cheap = product("Mug", "", 500, category);
        let pricey = product("Lamp", "", 12000, category);

        let min_only = ProductFilter::new(None, Some(Money::from_cents(1000).unwrap()), None, None);
        assert!(!min_only.matches(&cheap));
        assert!(min_only.matches(&pricey));

        let max_only = ProductFilter::new(None, None, Some(Money::from_cents(1000).unwrap()), None);
        assert!(max_only.matches(&cheap));
        assert!(!max_only.matches(&pricey));
    }

    #[test]
    fn category_is_an_exact_match() {
        let books = EntityId::generate();
        let toys = EntityId::generate();
        let filter = ProductFilter::new(Some(books), None, None, None);

        assert!(filter.matches(&product("Novel", "", 1500, books)));
        assert!(!filter.matches(&product("Kite", "", 1500, toys)));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = ProductFilter::new(None, None, None, Some("   ".to_string()));
        assert_eq!(filter.search(), None);
        assert_eq!(filter, ProductFilter::default());
    }

    #[test]
    fn search_keeps_surrounding_whitespace() {
        let category = EntityId::generate();
        let filter = ProductFilter::new(None, None, None, Some(" Shirt".to_string()));
        assert_eq!(filter.search(), Some(" shirt"));

        assert!(filter.matches(&product("Blue shirt", "", 1000, category)));
        assert!(filter.matches(&product("Polo", "a shirt for summer", 1000, category)));
        assert!(!filter.matches(&product("Tshirt", "", 1000, category)));
        assert!(!filter.matches(&product("Shirt", "", 1000, category)));
    }
}
